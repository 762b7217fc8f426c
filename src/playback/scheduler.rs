//! Block-based progression playback
//!
//! Audio hosts pull MIDI in fixed-size blocks. [`ProgressionPlayer`] lays the
//! chords of a progression back to back on an absolute sample timeline,
//! generates each chord's events when its onset reaches the current block,
//! and holds everything that falls past the block until a later call.

use tracing::{debug, info};

use super::engine::generate;
use super::types::{sort_for_output, BlockEvent, TimedEvent};
use crate::parser::StructuredChord;
use crate::settings::PlaybackSettings;

#[derive(Debug, Clone, Default)]
pub struct ProgressionPlayer {
    chords: Vec<StructuredChord>,
    settings: PlaybackSettings,
    active: bool,
    /// Index of the next chord to generate
    next_chord: usize,
    /// Absolute onset of the next chord
    next_chord_start: u64,
    /// Absolute position of the first sample of the next block
    clock: u64,
    /// Generated events not yet handed out, in output order
    pending: Vec<TimedEvent>,
}

impl ProgressionPlayer {
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn chords(&self) -> &[StructuredChord] {
        &self.chords
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    /// Settings changes apply from the next chord onset.
    pub fn settings_mut(&mut self) -> &mut PlaybackSettings {
        &mut self.settings
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Replace the progression. Any playback in progress is abandoned.
    pub fn update_progression(&mut self, chords: Vec<StructuredChord>) {
        self.chords = chords;
        self.reset();
    }

    /// Start playing from the first chord.
    ///
    /// Returns `false` (and does nothing) when there are no chords or playback
    /// is already running.
    pub fn trigger(&mut self) -> bool {
        if self.chords.is_empty() {
            debug!("cannot start playback: no chords in progression");
            return false;
        }
        if self.active {
            debug!("playback already in progress, ignoring trigger");
            return false;
        }

        self.reset();
        self.active = true;
        info!(chords = self.chords.len(), "starting playback");
        true
    }

    fn reset(&mut self) {
        self.active = false;
        self.next_chord = 0;
        self.next_chord_start = 0;
        self.clock = 0;
        self.pending.clear();
    }

    /// Advance by one block of `block_len` samples and return the events that
    /// fall inside it, with offsets relative to the block start.
    ///
    /// # Examples
    /// ```
    /// use chordgen::{parse, PlaybackSettings};
    /// use chordgen::playback::ProgressionPlayer;
    ///
    /// let mut player = ProgressionPlayer::new(PlaybackSettings::default());
    /// player.update_progression(parse("C G"));
    /// assert!(player.trigger());
    ///
    /// // 1 bar at 22050 samples per beat = 88200 samples per chord
    /// let first = player.process_block(512, 22050);
    /// assert_eq!(first.len(), 3);
    /// assert!(first.iter().all(|e| e.offset == 0 && e.event.is_note_on()));
    /// ```
    pub fn process_block(&mut self, block_len: u64, samples_per_beat: u64) -> Vec<BlockEvent> {
        if !self.active {
            return Vec::new();
        }

        let block_start = self.clock;
        let block_end = block_start.saturating_add(block_len);

        while self.next_chord < self.chords.len() && self.next_chord_start < block_end {
            let config = self.settings.config(samples_per_beat, self.next_chord_start);
            let chord_length = (config.duration_in_beats * samples_per_beat as f64) as u64;

            self.pending
                .extend(generate(&self.chords[self.next_chord], &config));
            self.next_chord_start = self.next_chord_start.saturating_add(chord_length);
            self.next_chord += 1;
        }

        sort_for_output(&mut self.pending);
        let due = self.pending.partition_point(|e| e.timestamp < block_end);
        let events = self
            .pending
            .drain(..due)
            .map(|event| BlockEvent {
                offset: event.timestamp.saturating_sub(block_start),
                event,
            })
            .collect();

        self.clock = block_end;
        if self.next_chord >= self.chords.len() && self.pending.is_empty() {
            self.active = false;
            info!("playback finished");
        }

        events
    }
}

//! Event generation engine
//!
//! Converts one chord plus playback parameters into note-on/note-off events
//! with sample-accurate timestamps. Every call is independent: the same chord
//! and config always produce the same events.

use tracing::debug;

use super::types::{PlayStyle, PlaybackConfig, TimedEvent};
use crate::parser::StructuredChord;
use crate::theory::clamp_pitch;

/// Chord length used when the requested duration is not positive
pub const MIN_DURATION_BEATS: f64 = 0.25;

/// Generate the events for one chord.
///
/// # Examples
/// ```
/// use chordgen::{parse_chord_symbol, playback::{generate, PlaybackConfig}};
///
/// let chord = parse_chord_symbol("C").unwrap();
/// let config = PlaybackConfig { duration_in_beats: 1.0, ..PlaybackConfig::default() };
/// let events = generate(&chord, &config);
///
/// assert_eq!(events.len(), 6);
/// assert!(events[..3].iter().all(|e| e.is_note_on() && e.timestamp == 0));
/// assert!(events[3..].iter().all(|e| !e.is_note_on() && e.timestamp == 22050));
/// ```
pub fn generate(chord: &StructuredChord, config: &PlaybackConfig) -> Vec<TimedEvent> {
    let duration_in_beats = if config.duration_in_beats > 0.0 {
        config.duration_in_beats
    } else {
        debug!(duration = config.duration_in_beats, "non-positive duration, using minimum");
        MIN_DURATION_BEATS
    };

    let velocity = if config.velocity > 0 {
        config.velocity.min(127) as u8
    } else {
        debug!(velocity = config.velocity, "non-positive velocity, using 1");
        1
    };

    let pitches = pitch_set(chord, config.octave);
    let duration_in_samples = (duration_in_beats * config.samples_per_beat as f64) as u64;

    match config.style {
        PlayStyle::BlockChord => {
            generate_block_chord(&pitches, velocity, config.start_sample, duration_in_samples)
        }
        PlayStyle::Arpeggio => generate_arpeggio(
            &pitches,
            velocity,
            config.start_sample,
            duration_in_samples,
            config.arp_speed.samples_per_note(config.samples_per_beat),
        ),
    }
}

/// MIDI pitches sounded for `chord` with its root in `octave`.
///
/// A resolvable bass note comes first, one octave below `octave`, followed by
/// the root plus each interval of the chord quality. Every pitch is clamped to
/// 0..=127 on its own.
///
/// # Examples
/// ```
/// use chordgen::{parse_chord_symbol, playback::pitch_set};
///
/// let chord = parse_chord_symbol("Am7/G").unwrap();
/// assert_eq!(pitch_set(&chord, 4), vec![55, 69, 72, 76, 79]);
/// ```
pub fn pitch_set(chord: &StructuredChord, octave: i32) -> Vec<u8> {
    let root = i64::from(chord.root.midi_number(octave));
    let intervals = chord.quality.intervals();

    let mut pitches = Vec::with_capacity(intervals.len() + 1);
    match (chord.bass_note(), chord.bass.as_deref()) {
        (Some(bass), _) => pitches.push(bass.midi_number(octave.saturating_sub(1))),
        (None, Some(spelling)) => debug!(bass = spelling, "unknown bass note, skipping"),
        (None, None) => {}
    }
    pitches.extend(intervals.iter().map(|&i| clamp_pitch(root + i64::from(i))));
    pitches
}

/// All note-ons at `start`, all note-offs at `start + duration`.
fn generate_block_chord(pitches: &[u8], velocity: u8, start: u64, duration: u64) -> Vec<TimedEvent> {
    let end = start.saturating_add(duration);

    let note_ons = pitches.iter().map(|&p| TimedEvent::note_on(p, velocity, start));
    let note_offs = pitches.iter().map(|&p| TimedEvent::note_off(p, end));
    note_ons.chain(note_offs).collect()
}

/// Cycle through `pitches` one step at a time until the chord ends. Each
/// note is released after one step or at the chord end, whichever is first.
fn generate_arpeggio(
    pitches: &[u8],
    velocity: u8,
    start: u64,
    duration: u64,
    samples_per_note: u64,
) -> Vec<TimedEvent> {
    if pitches.is_empty() || samples_per_note == 0 {
        return Vec::new();
    }

    let end = start.saturating_add(duration);
    let mut events = Vec::new();
    let mut current = start;

    for &pitch in pitches.iter().cycle() {
        if current >= end {
            break;
        }
        let release = current.saturating_add(samples_per_note).min(end);
        events.push(TimedEvent::note_on(pitch, velocity, current));
        events.push(TimedEvent::note_off(pitch, release));
        current = current.saturating_add(samples_per_note);
    }

    events
}

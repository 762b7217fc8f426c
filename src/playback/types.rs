//! Playback type definitions
//!
//! This module defines the playback parameters and the timed note events
//! produced by the event generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the pitches of a chord are sounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayStyle {
    /// All pitches sound together for the whole chord duration
    #[default]
    #[serde(rename = "block")]
    BlockChord,
    /// Pitches sound one at a time, cycling until the chord ends
    Arpeggio,
}

impl PlayStyle {
    /// Persisted ordinal: 0 = block chord, 1 = arpeggio
    pub fn ordinal(self) -> i64 {
        match self {
            Self::BlockChord => 0,
            Self::Arpeggio => 1,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(Self::BlockChord),
            1 => Some(Self::Arpeggio),
            _ => None,
        }
    }
}

impl FromStr for PlayStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "block" | "blockchord" | "block-chord" => Ok(Self::BlockChord),
            "arp" | "arpeggio" => Ok(Self::Arpeggio),
            other => Err(format!("unknown play style '{}' (expected block or arpeggio)", other)),
        }
    }
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockChord => f.write_str("block"),
            Self::Arpeggio => f.write_str("arpeggio"),
        }
    }
}

/// Length of each arpeggio step, as a note value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArpSpeed {
    #[serde(rename = "1/32")]
    ThirtySecond,
    #[default]
    #[serde(rename = "1/16")]
    Sixteenth,
    #[serde(rename = "1/8")]
    Eighth,
    #[serde(rename = "1/4")]
    Quarter,
}

impl ArpSpeed {
    /// Persisted ordinal, 0 (1/32) through 3 (1/4)
    pub fn ordinal(self) -> i64 {
        match self {
            Self::ThirtySecond => 0,
            Self::Sixteenth => 1,
            Self::Eighth => 2,
            Self::Quarter => 3,
        }
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(Self::ThirtySecond),
            1 => Some(Self::Sixteenth),
            2 => Some(Self::Eighth),
            3 => Some(Self::Quarter),
            _ => None,
        }
    }

    /// Samples per arpeggio step for a given quarter-note length.
    ///
    /// # Examples
    /// ```
    /// use chordgen::playback::ArpSpeed;
    ///
    /// assert_eq!(ArpSpeed::ThirtySecond.samples_per_note(22050), 2756);
    /// assert_eq!(ArpSpeed::Sixteenth.samples_per_note(22050), 5512);
    /// assert_eq!(ArpSpeed::Quarter.samples_per_note(22050), 22050);
    /// ```
    pub fn samples_per_note(self, samples_per_beat: u64) -> u64 {
        match self {
            Self::ThirtySecond => samples_per_beat / 8,
            Self::Sixteenth => samples_per_beat / 4,
            Self::Eighth => samples_per_beat / 2,
            Self::Quarter => samples_per_beat,
        }
    }
}

impl FromStr for ArpSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1/32" | "32" => Ok(Self::ThirtySecond),
            "1/16" | "16" => Ok(Self::Sixteenth),
            "1/8" | "8" => Ok(Self::Eighth),
            "1/4" | "4" => Ok(Self::Quarter),
            other => Err(format!("unknown arpeggio speed '{}' (expected 1/32, 1/16, 1/8 or 1/4)", other)),
        }
    }
}

impl fmt::Display for ArpSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ThirtySecond => "1/32",
            Self::Sixteenth => "1/16",
            Self::Eighth => "1/8",
            Self::Quarter => "1/4",
        };
        f.write_str(label)
    }
}

/// Parameters for one chord-generation call
///
/// # Fields
/// - `octave`: octave of the chord root (C4 = 60 lives in octave 4)
/// - `duration_in_beats`: chord length in quarter notes; values <= 0 become 0.25
/// - `velocity`: note-on velocity; values <= 0 become 1, the rest clamp to 1..=127
/// - `samples_per_beat`: quarter-note length in samples, computed by the caller
/// - `start_sample`: timestamp of the chord onset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackConfig {
    pub octave: i32,
    pub duration_in_beats: f64,
    pub velocity: i32,
    pub style: PlayStyle,
    pub arp_speed: ArpSpeed,
    pub samples_per_beat: u64,
    pub start_sample: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            octave: 4,
            duration_in_beats: 4.0,
            velocity: 100,
            style: PlayStyle::BlockChord,
            arp_speed: ArpSpeed::Sixteenth,
            // 44.1 kHz at 120 BPM
            samples_per_beat: 22050,
            start_sample: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    NoteOn,
    NoteOff,
}

/// A note event at an absolute sample position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedEvent {
    pub kind: EventKind,
    pub pitch: u8,
    pub velocity: u8,
    pub timestamp: u64,
}

impl TimedEvent {
    pub fn note_on(pitch: u8, velocity: u8, timestamp: u64) -> Self {
        Self {
            kind: EventKind::NoteOn,
            pitch,
            velocity,
            timestamp,
        }
    }

    /// Note-offs carry velocity 0
    pub fn note_off(pitch: u8, timestamp: u64) -> Self {
        Self {
            kind: EventKind::NoteOff,
            pitch,
            velocity: 0,
            timestamp,
        }
    }

    pub fn is_note_on(&self) -> bool {
        self.kind == EventKind::NoteOn
    }
}

/// An event placed inside one output block
///
/// `offset` is relative to the first sample of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockEvent {
    pub offset: u64,
    pub event: TimedEvent,
}

/// Stable sort into output order: by timestamp, note-offs before note-ons at
/// the same sample so a repeated pitch is released before it is struck again.
pub fn sort_for_output(events: &mut [TimedEvent]) {
    events.sort_by_key(|e| (e.timestamp, e.is_note_on()));
}

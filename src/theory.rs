//! # Music Theory Tables
//!
//! Static lookup data shared by the chord parser and the event generator:
//! note spellings to pitch classes, chord qualities to interval sets, and
//! note + octave to MIDI pitch numbers.
//!
//! All tables are `'static` and never mutated, so they are safe to read from
//! any thread without synchronization.
//!
//! ## MIDI Note Reference
//! - Pitch number = `(octave + 1) * 12 + pitch_class`, clamped to 0..=127
//! - C4 = 60 (middle C), A4 = 69
//!
//! ## Example
//! ```rust
//! use chordgen::theory::{pitch_number, semitone_offset, intervals_for};
//!
//! assert_eq!(semitone_offset("Db"), Some(1));
//! assert_eq!(pitch_number("C", 4), Some(60));
//! assert_eq!(pitch_number("H", 4), None);
//! assert_eq!(intervals_for("min7"), &[0, 3, 7, 10]);
//! ```

use serde::{Serialize, Serializer};
use std::fmt;

/// MIDI note number for middle C (C4)
pub const MIDDLE_C: u8 = 60;

/// Highest MIDI pitch number
pub const MAX_PITCH: u8 = 127;

/// Fallback interval set for qualities missing from the catalog
pub const MAJOR_TRIAD: &[i32] = &[0, 4, 7];

/// Accepted note spellings and their semitone offset from C.
///
/// Spellings are case-sensitive. Only the sharp/flat names commonly written in
/// chord charts are accepted; `E#`, `Fb`, `B#` and `Cb` are not.
const NOTE_OFFSETS: &[(&str, u8)] = &[
    ("C", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
];

/// A recognized note spelling together with its pitch class.
///
/// A `NoteName` can only be obtained from [`NoteName::from_spelling`], so a
/// value of this type always refers to one of the accepted spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteName {
    spelling: &'static str,
    pitch_class: u8,
}

impl NoteName {
    /// Look up a spelling such as `"C"`, `"F#"` or `"Bb"`.
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        NOTE_OFFSETS
            .iter()
            .find(|(name, _)| *name == spelling)
            .map(|&(spelling, pitch_class)| Self {
                spelling,
                pitch_class,
            })
    }

    /// Every accepted spelling, in chromatic order.
    pub fn all() -> impl Iterator<Item = NoteName> {
        NOTE_OFFSETS.iter().map(|&(spelling, pitch_class)| Self {
            spelling,
            pitch_class,
        })
    }

    pub fn spelling(&self) -> &'static str {
        self.spelling
    }

    /// Semitone offset from C, in 0..=11
    pub fn pitch_class(&self) -> u8 {
        self.pitch_class
    }

    /// MIDI pitch number of this note in `octave`, clamped to 0..=127.
    pub fn midi_number(&self, octave: i32) -> u8 {
        clamp_pitch((i64::from(octave) + 1) * 12 + i64::from(self.pitch_class))
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling)
    }
}

impl Serialize for NoteName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.spelling)
    }
}

/// Chord qualities known to the interval table.
///
/// The serialized form is the quality name used by the parser ("major",
/// "min7b5", "7", ...). The display symbol used in chord charts is available
/// through [`ChordQuality::symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChordQuality {
    #[serde(rename = "major")]
    Major,
    #[serde(rename = "minor")]
    Minor,
    #[serde(rename = "dim")]
    Diminished,
    #[serde(rename = "aug")]
    Augmented,
    #[serde(rename = "sus2")]
    Sus2,
    #[serde(rename = "sus4")]
    Sus4,
    #[serde(rename = "maj7")]
    Major7,
    #[serde(rename = "min7")]
    Minor7,
    #[serde(rename = "7")]
    Dominant7,
    #[serde(rename = "dim7")]
    Diminished7,
    #[serde(rename = "min7b5")]
    HalfDiminished7,
    #[serde(rename = "maj9")]
    Major9,
    #[serde(rename = "min9")]
    Minor9,
    #[serde(rename = "9")]
    Dominant9,
    #[serde(rename = "maj11")]
    Major11,
    #[serde(rename = "11")]
    Dominant11,
    #[serde(rename = "maj13")]
    Major13,
    #[serde(rename = "13")]
    Dominant13,
    #[serde(rename = "add9")]
    Add9,
    #[serde(rename = "add11")]
    Add11,
    #[serde(rename = "7#5")]
    Dominant7Sharp5,
    #[serde(rename = "7b9")]
    Dominant7Flat9,
    #[serde(rename = "7#9")]
    Dominant7Sharp9,
    #[serde(rename = "7b5")]
    Dominant7Flat5,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 24] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Sus2,
        ChordQuality::Sus4,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::Dominant7,
        ChordQuality::Diminished7,
        ChordQuality::HalfDiminished7,
        ChordQuality::Major9,
        ChordQuality::Minor9,
        ChordQuality::Dominant9,
        ChordQuality::Major11,
        ChordQuality::Dominant11,
        ChordQuality::Major13,
        ChordQuality::Dominant13,
        ChordQuality::Add9,
        ChordQuality::Add11,
        ChordQuality::Dominant7Sharp5,
        ChordQuality::Dominant7Flat9,
        ChordQuality::Dominant7Sharp9,
        ChordQuality::Dominant7Flat5,
    ];

    /// Look up a quality by name, accepting the long-form aliases
    /// ("diminished", "augmented", "dom7", "m7b5", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let quality = match name {
            "major" => Self::Major,
            "minor" => Self::Minor,
            "dim" | "diminished" => Self::Diminished,
            "aug" | "augmented" => Self::Augmented,
            "sus2" => Self::Sus2,
            "sus4" => Self::Sus4,
            "maj7" => Self::Major7,
            "min7" | "m7" => Self::Minor7,
            "7" | "dom7" => Self::Dominant7,
            "dim7" => Self::Diminished7,
            "min7b5" | "m7b5" => Self::HalfDiminished7,
            "maj9" => Self::Major9,
            "min9" | "m9" => Self::Minor9,
            "9" | "dom9" => Self::Dominant9,
            "maj11" => Self::Major11,
            "11" => Self::Dominant11,
            "maj13" => Self::Major13,
            "13" => Self::Dominant13,
            "add9" => Self::Add9,
            "add11" => Self::Add11,
            "7#5" => Self::Dominant7Sharp5,
            "7b9" => Self::Dominant7Flat9,
            "7#9" => Self::Dominant7Sharp9,
            "7b5" => Self::Dominant7Flat5,
            _ => return None,
        };
        Some(quality)
    }

    /// Canonical quality name, the key of the interval table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Diminished => "dim",
            Self::Augmented => "aug",
            Self::Sus2 => "sus2",
            Self::Sus4 => "sus4",
            Self::Major7 => "maj7",
            Self::Minor7 => "min7",
            Self::Dominant7 => "7",
            Self::Diminished7 => "dim7",
            Self::HalfDiminished7 => "min7b5",
            Self::Major9 => "maj9",
            Self::Minor9 => "min9",
            Self::Dominant9 => "9",
            Self::Major11 => "maj11",
            Self::Dominant11 => "11",
            Self::Major13 => "maj13",
            Self::Dominant13 => "13",
            Self::Add9 => "add9",
            Self::Add11 => "add11",
            Self::Dominant7Sharp5 => "7#5",
            Self::Dominant7Flat9 => "7b9",
            Self::Dominant7Sharp9 => "7#9",
            Self::Dominant7Flat5 => "7b5",
        }
    }

    /// Chord-chart symbol written after the root (`""` for major, `"m"` for minor).
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Major => "",
            Self::Minor => "m",
            Self::Minor7 => "m7",
            Self::HalfDiminished7 => "m7b5",
            Self::Minor9 => "m9",
            other => other.name(),
        }
    }

    /// Semitone offsets from the root. Upper extensions go past 12.
    pub fn intervals(&self) -> &'static [i32] {
        match self {
            // Triads
            Self::Major => &[0, 4, 7],
            Self::Minor => &[0, 3, 7],
            Self::Diminished => &[0, 3, 6],
            Self::Augmented => &[0, 4, 8],

            // Suspended
            Self::Sus2 => &[0, 2, 7],
            Self::Sus4 => &[0, 5, 7],

            // Sevenths
            Self::Major7 => &[0, 4, 7, 11],
            Self::Minor7 => &[0, 3, 7, 10],
            Self::Dominant7 => &[0, 4, 7, 10],
            Self::Diminished7 => &[0, 3, 6, 9],
            Self::HalfDiminished7 => &[0, 3, 6, 10],

            // Ninths
            Self::Major9 => &[0, 4, 7, 11, 14],
            Self::Minor9 => &[0, 3, 7, 10, 14],
            Self::Dominant9 => &[0, 4, 7, 10, 14],

            // Elevenths and thirteenths
            Self::Major11 => &[0, 4, 7, 11, 14, 17],
            Self::Dominant11 => &[0, 4, 7, 10, 14, 17],
            Self::Major13 => &[0, 4, 7, 11, 14, 17, 21],
            Self::Dominant13 => &[0, 4, 7, 10, 14, 17, 21],

            // Added tones
            Self::Add9 => &[0, 4, 7, 14],
            Self::Add11 => &[0, 4, 7, 17],

            // Altered dominants
            Self::Dominant7Sharp5 => &[0, 4, 8, 10],
            Self::Dominant7Flat9 => &[0, 4, 7, 10, 13],
            Self::Dominant7Sharp9 => &[0, 4, 7, 10, 15],
            Self::Dominant7Flat5 => &[0, 4, 6, 10],
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semitone offset from C for an exact note spelling.
pub fn semitone_offset(note_name: &str) -> Option<u8> {
    NoteName::from_spelling(note_name).map(|n| n.pitch_class())
}

pub fn is_valid_note_name(note_name: &str) -> bool {
    NoteName::from_spelling(note_name).is_some()
}

/// Interval set for a quality name. Unknown names fall back to the major triad.
pub fn intervals_for(quality: &str) -> &'static [i32] {
    match ChordQuality::from_name(quality) {
        Some(q) => q.intervals(),
        None => {
            tracing::warn!(quality, "unknown chord quality, using major triad");
            MAJOR_TRIAD
        }
    }
}

/// MIDI pitch number for a note spelling in `octave`.
///
/// Returns `None` when the spelling is not recognized; out-of-range octaves
/// clamp to 0..=127 instead of failing.
pub fn pitch_number(note_name: &str, octave: i32) -> Option<u8> {
    NoteName::from_spelling(note_name).map(|n| n.midi_number(octave))
}

/// Clamp an arbitrary pitch value into the MIDI range.
pub fn clamp_pitch(value: i64) -> u8 {
    value.clamp(0, i64::from(MAX_PITCH)) as u8
}

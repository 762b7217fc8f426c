//! # Error Types
//!
//! This module defines the error type for the chord generator.
//!
//! Chord recognition and event generation degrade gracefully: a token that is
//! not a chord is skipped and an unplayable chord produces no events. The
//! recognition variants below are therefore used per token inside the parser
//! and filtered out before the caller sees them. Only the configuration
//! surfaces (front matter, persisted state, transport) hand errors back.
//!
//! ## Error Types
//! - `UnrecognizedToken` - a token that does not match the chord grammar
//! - `InvalidNoteName` - a chord root that is not a known note spelling
//! - `SettingsError` - a front matter setting with an invalid value
//! - `StateError` - persisted state could not be written or read
//! - `TimingError` - a transport with a non-positive sample rate or beat length
//!
//! ## Usage
//! ```rust
//! use chordgen::{parse_chord_symbol, ChordGenError};
//!
//! match parse_chord_symbol("Hm7") {
//!     Ok(chord) => println!("chord: {}", chord.display_name()),
//!     Err(ChordGenError::UnrecognizedToken(token)) => eprintln!("not a chord: {}", token),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordGenError {
    /// A token that does not match the chord-symbol grammar.
    ///
    /// # Example
    /// ```
    /// # use chordgen::ChordGenError;
    /// let err = ChordGenError::UnrecognizedToken("Enjoy".to_string());
    /// assert_eq!(err.to_string(), "Not a chord symbol: 'Enjoy'");
    /// ```
    #[error("Not a chord symbol: '{0}'")]
    UnrecognizedToken(String),

    /// The token matched the grammar but its root has no pitch class (e.g. `E#`).
    #[error("Invalid note name: '{0}'")]
    InvalidNoteName(String),

    /// A front matter setting has an invalid value.
    ///
    /// # Example
    /// ```
    /// # use chordgen::ChordGenError;
    /// let err = ChordGenError::SettingsError("style must be block or arpeggio".to_string());
    /// assert_eq!(err.to_string(), "Invalid settings: style must be block or arpeggio");
    /// ```
    #[error("Invalid settings: {0}")]
    SettingsError(String),

    /// The persisted state blob could not be serialized.
    #[error("State error: {0}")]
    StateError(String),

    /// The transport cannot produce a positive number of samples per beat.
    #[error("Timing error: {0}")]
    TimingError(String),
}

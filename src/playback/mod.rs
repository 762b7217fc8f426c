//! # Playback Module
//!
//! Turn parsed chords into sample-accurate MIDI note events.
//!
//! ## Sub-modules
//! - `types` - PlaybackConfig, TimedEvent, PlayStyle, ArpSpeed definitions
//! - `engine` - per-chord event generation (block chords and arpeggios)
//! - `transport` - sample rate and tempo to samples-per-beat conversion
//! - `scheduler` - block-by-block playback of a whole progression
//!
//! ## Entry Points
//! - [`generate()`] - events for one chord
//! - [`ProgressionPlayer`] - events for a progression, sliced into host blocks
//!
//! ## Example
//! ```rust
//! use chordgen::parse_chord_symbol;
//! use chordgen::playback::{generate, ArpSpeed, PlayStyle, PlaybackConfig};
//!
//! let chord = parse_chord_symbol("Am").unwrap();
//! let config = PlaybackConfig {
//!     duration_in_beats: 1.0,
//!     style: PlayStyle::Arpeggio,
//!     arp_speed: ArpSpeed::Eighth,
//!     samples_per_beat: 1000,
//!     ..PlaybackConfig::default()
//! };
//!
//! let events = generate(&chord, &config);
//! // Two eighth notes fit in one beat: A4 then C5
//! assert_eq!(events.len(), 4);
//! assert_eq!(events[0].pitch, 69);
//! assert_eq!(events[2].pitch, 72);
//! assert_eq!(events[2].timestamp, 500);
//! ```
//!
//! ## Timing
//!
//! All timestamps are absolute sample positions. The caller supplies
//! `samples_per_beat` (a beat is a quarter note) so the engine never deals
//! with tempo. Durations are truncated to whole samples.
//!
//! ### Block chords
//! Every pitch starts at `start_sample` and stops at
//! `start_sample + duration_in_samples`.
//!
//! ### Arpeggios
//! Pitches play in order, one step each, wrapping around until the chord
//! length is used up. A step that would run past the chord end is cut short.
//!
//! ## Related Modules
//! - `parser` - produces the StructuredChord values consumed here
//! - `theory` - interval sets and pitch numbers
//! - `settings` - user-facing parameters that build a PlaybackConfig

mod types;
mod engine;
mod transport;
mod scheduler;


pub use types::{
    sort_for_output, ArpSpeed, BlockEvent, EventKind, PlayStyle, PlaybackConfig, TimedEvent,
};
pub use engine::{generate, pitch_set, MIN_DURATION_BEATS};
pub use transport::{Transport, BEATS_PER_BAR, DEFAULT_BPM};
pub use scheduler::ProgressionPlayer;

//! # chordgen
//!
//! Turn chord names in free-form text into sample-accurate MIDI note events.
//!
//! ```rust
//! use chordgen::{render_progression, PlaybackSettings};
//! use chordgen::playback::Transport;
//!
//! let text = "Here's a progression: Cmaj7, Dm7, G7. Enjoy!";
//! let transport = Transport::new(44100.0, Some(120.0)).unwrap();
//! let events = render_progression(text, &PlaybackSettings::default(), &transport).unwrap();
//!
//! // Three four-note chords, one note-on and one note-off per pitch
//! assert_eq!(events.len(), 24);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod playback;
pub mod settings;
pub mod theory;

pub use error::*;
pub use parser::{parse, parse_chord_symbol, StructuredChord, MAX_CHORDS};
pub use settings::{split_front_matter, PlaybackSettings, RawSettings};
pub use theory::{ChordQuality, NoteName};

use playback::{generate, sort_for_output, TimedEvent, Transport};

/// Lay `chords` back to back from sample 0 and return every event in output
/// order. Each chord lasts `settings.duration_bars()` bars.
pub fn render_chords(
    chords: &[StructuredChord],
    settings: &PlaybackSettings,
    transport: &Transport,
) -> Vec<TimedEvent> {
    let samples_per_beat = transport.samples_per_beat();
    let chord_length = transport.bars_to_samples(settings.duration_bars());

    let mut events = Vec::new();
    let mut start = 0u64;
    for chord in chords {
        events.extend(generate(chord, &settings.config(samples_per_beat, start)));
        start = start.saturating_add(chord_length);
    }

    sort_for_output(&mut events);
    events
}

/// Parse `text` and render the whole progression offline.
///
/// Front matter at the top of `text` overrides `settings`, and its `tempo`
/// key overrides the transport tempo.
pub fn render_progression(
    text: &str,
    settings: &PlaybackSettings,
    transport: &Transport,
) -> Result<Vec<TimedEvent>, ChordGenError> {
    let (front_matter, body) = split_front_matter(text)?;

    let mut settings = *settings;
    let mut transport = *transport;
    if let Some(raw) = front_matter {
        raw.apply(&mut settings)?;
        if let Some(bpm) = raw.tempo {
            transport = Transport::new(transport.sample_rate, Some(bpm))?;
        }
    }

    Ok(render_chords(&parse(body), &settings, &transport))
}

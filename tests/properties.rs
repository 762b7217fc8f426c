//! Property tests for the theory tables, the parser and the event generator.

use std::collections::HashMap;

use proptest::prelude::*;

use chordgen::playback::{generate, ArpSpeed, EventKind, PlayStyle, PlaybackConfig};
use chordgen::theory::{pitch_number, semitone_offset};
use chordgen::{parse, parse_chord_symbol, ChordQuality, NoteName, StructuredChord};

fn note_name() -> impl Strategy<Value = NoteName> {
    let names: Vec<NoteName> = NoteName::all().collect();
    prop::sample::select(names)
}

fn quality() -> impl Strategy<Value = ChordQuality> {
    prop::sample::select(ChordQuality::ALL.to_vec())
}

fn chord() -> impl Strategy<Value = StructuredChord> {
    (note_name(), quality(), prop::option::of(note_name())).prop_map(|(root, quality, bass)| {
        let chord = StructuredChord::new(root, quality);
        match bass {
            Some(bass) => chord.with_bass(bass.spelling()),
            None => chord,
        }
    })
}

/// Tokens matching the chord grammar, with mixed-case quality keywords.
fn chord_token() -> impl Strategy<Value = String> {
    let quality = prop::sample::select(vec![
        "", "maj", "MAJ", "min", "Min", "m", "dim", "aug", "sus", "add", "dom", "Dom",
    ]);
    let bass = prop::option::of(note_name());
    (
        note_name(),
        any::<bool>(),
        quality,
        "(b?[0-9]{1,2}|#[0-9]){0,3}",
        bass,
    )
        .prop_map(|(root, lower, quality, extensions, bass)| {
            let mut token = if lower {
                root.spelling().to_lowercase()
            } else {
                root.spelling().to_string()
            };
            token.push_str(quality);
            token.push_str(&extensions);
            if let Some(bass) = bass {
                token.push('/');
                token.push_str(bass.spelling());
            }
            token
        })
}

fn play_style() -> impl Strategy<Value = PlayStyle> {
    prop_oneof![Just(PlayStyle::BlockChord), Just(PlayStyle::Arpeggio)]
}

fn arp_speed() -> impl Strategy<Value = ArpSpeed> {
    prop_oneof![
        Just(ArpSpeed::ThirtySecond),
        Just(ArpSpeed::Sixteenth),
        Just(ArpSpeed::Eighth),
        Just(ArpSpeed::Quarter),
    ]
}

fn config() -> impl Strategy<Value = PlaybackConfig> {
    (
        -2i32..11,
        -1.0f64..8.0,
        -10i32..200,
        play_style(),
        arp_speed(),
        1u64..50_000,
        0u64..1_000_000,
    )
        .prop_map(
            |(octave, duration_in_beats, velocity, style, arp_speed, samples_per_beat, start_sample)| {
                PlaybackConfig {
                    octave,
                    duration_in_beats,
                    velocity,
                    style,
                    arp_speed,
                    samples_per_beat,
                    start_sample,
                }
            },
        )
}

proptest! {
    #[test]
    fn semitone_offsets_in_range(note in note_name()) {
        let offset = semitone_offset(note.spelling()).unwrap();
        prop_assert!(offset <= 11);
        prop_assert_eq!(offset, note.pitch_class());
    }

    #[test]
    fn pitch_numbers_stay_in_midi_range(note in note_name(), octave in any::<i32>()) {
        let pitch = pitch_number(note.spelling(), octave).unwrap();
        prop_assert!(pitch <= 127);
    }

    #[test]
    fn parse_is_idempotent(text in "[A-Ga-z#/0-9 ,.|]{0,80}") {
        prop_assert_eq!(parse(&text), parse(&text));
    }

    #[test]
    fn parse_never_exceeds_cap(count in 0usize..300) {
        let text = vec!["Dm7"; count].join(" ");
        prop_assert_eq!(parse(&text).len(), count.min(100));
    }

    #[test]
    fn canonical_names_parse_back(token in chord_token()) {
        // Some generated tokens have no valid root (e.g. "E#5")
        let Ok(chord) = parse_chord_symbol(&token) else {
            return Ok(());
        };
        let reparsed = parse_chord_symbol(&chord.canonical_name()).unwrap();
        prop_assert_eq!(reparsed.root, chord.root);
        prop_assert_eq!(reparsed.quality, chord.quality);
        prop_assert_eq!(&reparsed.extensions, &chord.extensions);
        prop_assert_eq!(&reparsed.bass, &chord.bass);
        prop_assert_eq!(reparsed.canonical_name(), chord.canonical_name());
    }

    #[test]
    fn built_chords_parse_back(chord in chord()) {
        let reparsed = parse_chord_symbol(&chord.canonical_name()).unwrap();
        prop_assert_eq!(reparsed.root, chord.root);
        prop_assert_eq!(reparsed.bass, chord.bass);
    }

    #[test]
    fn every_note_on_has_one_later_note_off(chord in chord(), config in config()) {
        let events = generate(&chord, &config);

        // Oldest open note of the same pitch is released first
        let mut open: HashMap<u8, Vec<u64>> = HashMap::new();
        for event in &events {
            match event.kind {
                EventKind::NoteOn => open.entry(event.pitch).or_default().push(event.timestamp),
                EventKind::NoteOff => {
                    let starts = open.get_mut(&event.pitch).expect("note-off without note-on");
                    let start = starts.remove(0);
                    prop_assert!(start <= event.timestamp);
                }
            }
        }
        prop_assert!(open.values().all(|starts| starts.is_empty()));
    }

    #[test]
    fn events_stay_inside_chord_span(chord in chord(), config in config()) {
        let beats = if config.duration_in_beats > 0.0 { config.duration_in_beats } else { 0.25 };
        let end = config.start_sample + (beats * config.samples_per_beat as f64) as u64;

        for event in generate(&chord, &config) {
            prop_assert!(event.timestamp >= config.start_sample);
            prop_assert!(event.timestamp <= end);
            prop_assert!(event.pitch <= 127);
            if event.kind == EventKind::NoteOn {
                prop_assert!((1..=127).contains(&event.velocity));
            }
        }
    }
}

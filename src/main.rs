use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use chordgen::playback::{ArpSpeed, EventKind, PlayStyle, TimedEvent, Transport};
use chordgen::{parse, render_chords, split_front_matter, PlaybackSettings, StructuredChord};

/// Turn chord names in free-form text into MIDI note events
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Text file to read chords from (stdin when omitted)
    input: Option<PathBuf>,

    /// Tempo in BPM (front matter `tempo`, then 120)
    #[arg(long)]
    bpm: Option<f64>,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = 44100.0)]
    sample_rate: f64,

    /// Root octave, 0-8
    #[arg(long)]
    octave: Option<i32>,

    /// Chord length in bars, 0.25-16
    #[arg(long)]
    duration: Option<f64>,

    /// Note-on velocity, 1-127
    #[arg(long)]
    velocity: Option<i32>,

    /// block or arpeggio
    #[arg(long)]
    style: Option<PlayStyle>,

    /// Arpeggio step: 1/32, 1/16, 1/8 or 1/4
    #[arg(long)]
    arp_speed: Option<ArpSpeed>,

    /// Load settings from a persisted state file
    #[arg(long)]
    state: Option<PathBuf>,

    /// Write the effective settings to a state file
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Only list the recognized chords
    #[arg(long)]
    chords_only: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    settings: &'a PlaybackSettings,
    transport: &'a Transport,
    chords: &'a [StructuredChord],
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [TimedEvent]>,
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // Read input
    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("Error reading file '{}': {}", path.display(), e))),
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                fail(format!("Error reading stdin: {}", e));
            }
            buffer
        }
    };

    // Settings: persisted state, then front matter, then flags
    let mut settings = match &args.state {
        Some(path) => match fs::read_to_string(path) {
            Ok(xml) => PlaybackSettings::from_state_xml(&xml),
            Err(e) => fail(format!("Error reading state '{}': {}", path.display(), e)),
        },
        None => PlaybackSettings::default(),
    };

    let (front_matter, body) =
        split_front_matter(&text).unwrap_or_else(|e| fail(format!("Front matter error: {}", e)));
    let mut bpm = None;
    if let Some(raw) = &front_matter {
        if let Err(e) = raw.apply(&mut settings) {
            fail(format!("Front matter error: {}", e));
        }
        bpm = raw.tempo;
    }

    if let Some(octave) = args.octave {
        settings.set_octave(octave);
    }
    if let Some(duration) = args.duration {
        settings.set_duration_bars(duration);
    }
    if let Some(velocity) = args.velocity {
        settings.set_velocity(velocity);
    }
    if let Some(style) = args.style {
        settings.set_play_style(style);
    }
    if let Some(speed) = args.arp_speed {
        settings.set_arp_speed(speed);
    }

    let transport = Transport::new(args.sample_rate, args.bpm.or(bpm))
        .unwrap_or_else(|e| fail(e.to_string()));

    if let Some(path) = &args.save_state {
        let xml = settings.to_state_xml().unwrap_or_else(|e| fail(e.to_string()));
        if let Err(e) = fs::write(path, xml) {
            fail(format!("Error writing to '{}': {}", path.display(), e));
        }
        eprintln!("Wrote state to {}", path.display());
    }

    let chords = parse(body);
    if chords.is_empty() {
        eprintln!("No chords found");
    }
    let events = (!args.chords_only).then(|| render_chords(&chords, &settings, &transport));

    // Output
    if args.json {
        let output = Output {
            settings: &settings,
            transport: &transport,
            chords: &chords,
            events: events.as_deref(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(format!("Error serializing output: {}", e)),
        }
        return;
    }

    for (i, chord) in chords.iter().enumerate() {
        println!("{:>3}  {}", i + 1, chord.display_name());
    }
    if let Some(events) = events {
        println!();
        for event in events {
            let kind = match event.kind {
                EventKind::NoteOn => "on ",
                EventKind::NoteOff => "off",
            };
            println!(
                "{:>10}  {}  {:>3}  {:>3}",
                event.timestamp, kind, event.pitch, event.velocity
            );
        }
    }
}

//! # Playback Settings
//!
//! The five user-facing parameters of the chord generator, their ranges and
//! defaults, and the two ways they are loaded:
//!
//! - **Persisted state**: a single XML element written by the host
//!   integration, e.g.
//!   `<ChordGenState octave="4" duration="1" velocity="100" playStyle="0" arpSpeed="1"/>`.
//!   Missing or corrupt attributes fall back to their defaults. State saved
//!   under the plugin's `AIChordGeneratorState` element loads the same way.
//! - **Front matter**: an optional YAML block at the top of the input text.
//!
//! ```text
//! ---
//! octave: 3
//! duration: 0.5
//! style: arpeggio
//! arp-speed: 1/8
//! tempo: 96
//! ---
//! Am F C G
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ChordGenError;
use crate::playback::{ArpSpeed, PlayStyle, PlaybackConfig, BEATS_PER_BAR};

/// Root element of the persisted state
pub const STATE_TAG: &str = "ChordGenState";

/// Root element written by the original plugin host, still accepted on load
pub const LEGACY_STATE_TAG: &str = "AIChordGeneratorState";

pub const OCTAVE_RANGE: (i32, i32) = (0, 8);
pub const DURATION_BARS_RANGE: (f64, f64) = (0.25, 16.0);
pub const VELOCITY_RANGE: (i32, i32) = (1, 127);

/// User-facing playback parameters. Setters clamp to the supported ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettings {
    octave: i32,
    duration_bars: f64,
    velocity: i32,
    play_style: PlayStyle,
    arp_speed: ArpSpeed,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            octave: 4,
            duration_bars: 1.0,
            velocity: 100,
            play_style: PlayStyle::BlockChord,
            arp_speed: ArpSpeed::Sixteenth,
        }
    }
}

impl PlaybackSettings {
    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn set_octave(&mut self, value: i32) {
        self.octave = value.clamp(OCTAVE_RANGE.0, OCTAVE_RANGE.1);
    }

    /// Chord length in bars
    pub fn duration_bars(&self) -> f64 {
        self.duration_bars
    }

    pub fn set_duration_bars(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.duration_bars = value.clamp(DURATION_BARS_RANGE.0, DURATION_BARS_RANGE.1);
    }

    /// Chord length in beats (4 beats per bar)
    pub fn duration_in_beats(&self) -> f64 {
        self.duration_bars * BEATS_PER_BAR
    }

    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    pub fn set_velocity(&mut self, value: i32) {
        self.velocity = value.clamp(VELOCITY_RANGE.0, VELOCITY_RANGE.1);
    }

    pub fn play_style(&self) -> PlayStyle {
        self.play_style
    }

    pub fn set_play_style(&mut self, style: PlayStyle) {
        self.play_style = style;
    }

    pub fn arp_speed(&self) -> ArpSpeed {
        self.arp_speed
    }

    pub fn set_arp_speed(&mut self, speed: ArpSpeed) {
        self.arp_speed = speed;
    }

    /// Generation parameters for a chord starting at `start_sample`.
    pub fn config(&self, samples_per_beat: u64, start_sample: u64) -> PlaybackConfig {
        PlaybackConfig {
            octave: self.octave,
            duration_in_beats: self.duration_in_beats(),
            velocity: self.velocity,
            style: self.play_style,
            arp_speed: self.arp_speed,
            samples_per_beat,
            start_sample,
        }
    }

    /// Serialize to the persisted state element.
    pub fn to_state_xml(&self) -> Result<String, ChordGenError> {
        let mut element = BytesStart::new(STATE_TAG);
        element.push_attribute(("octave", self.octave.to_string().as_str()));
        element.push_attribute(("duration", self.duration_bars.to_string().as_str()));
        element.push_attribute(("velocity", self.velocity.to_string().as_str()));
        element.push_attribute(("playStyle", self.play_style.ordinal().to_string().as_str()));
        element.push_attribute(("arpSpeed", self.arp_speed.ordinal().to_string().as_str()));

        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Empty(element))
            .map_err(|e| ChordGenError::StateError(e.to_string()))?;
        String::from_utf8(writer.into_inner()).map_err(|e| ChordGenError::StateError(e.to_string()))
    }

    /// Restore from a persisted state element.
    ///
    /// Never fails: an unreadable blob or a foreign root element yields the
    /// defaults, and each missing or corrupt attribute keeps its default.
    ///
    /// # Examples
    /// ```
    /// use chordgen::PlaybackSettings;
    /// use chordgen::playback::PlayStyle;
    ///
    /// let settings = PlaybackSettings::from_state_xml(
    ///     r#"<ChordGenState octave="2" velocity="loud" playStyle="1"/>"#,
    /// );
    /// assert_eq!(settings.octave(), 2);
    /// assert_eq!(settings.velocity(), 100);
    /// assert_eq!(settings.play_style(), PlayStyle::Arpeggio);
    /// ```
    pub fn from_state_xml(xml: &str) -> Self {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                    let name = element.name();
                    if name.as_ref() != STATE_TAG.as_bytes()
                        && name.as_ref() != LEGACY_STATE_TAG.as_bytes()
                    {
                        warn!("unexpected state element, using default settings");
                        return Self::default();
                    }
                    return Self::from_state_attributes(&element);
                }
                Ok(Event::Eof) => return Self::default(),
                Err(e) => {
                    warn!(%e, "unreadable state, using default settings");
                    return Self::default();
                }
                Ok(_) => {}
            }
        }
    }

    fn from_state_attributes(element: &BytesStart<'_>) -> Self {
        let mut settings = Self::default();

        for attribute in element.attributes().flatten() {
            let Ok(value) = attribute.unescape_value() else {
                continue;
            };
            let value = value.trim();
            match attribute.key.as_ref() {
                b"octave" => {
                    if let Ok(v) = value.parse() {
                        settings.set_octave(v);
                    }
                }
                b"duration" => {
                    if let Ok(v) = value.parse() {
                        settings.set_duration_bars(v);
                    }
                }
                b"velocity" => {
                    if let Ok(v) = value.parse() {
                        settings.set_velocity(v);
                    }
                }
                b"playStyle" => {
                    if let Some(style) = value.parse().ok().and_then(PlayStyle::from_ordinal) {
                        settings.play_style = style;
                    }
                }
                b"arpSpeed" => {
                    if let Some(speed) = value.parse().ok().and_then(ArpSpeed::from_ordinal) {
                        settings.arp_speed = speed;
                    }
                }
                _ => {}
            }
        }

        settings
    }
}

/// Keys accepted in front matter
pub const FRONT_MATTER_KEYS: &[&str] = &["octave", "duration", "velocity", "style", "arp-speed", "tempo"];

/// Raw front matter for YAML deserialization
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawSettings {
    pub octave: Option<i32>,
    /// In bars
    pub duration: Option<f64>,
    pub velocity: Option<i32>,
    pub style: Option<String>,
    pub arp_speed: Option<String>,
    /// In BPM
    pub tempo: Option<f64>,
}

impl RawSettings {
    /// Override `settings` with every key present in the front matter.
    pub fn apply(&self, settings: &mut PlaybackSettings) -> Result<(), ChordGenError> {
        if let Some(octave) = self.octave {
            settings.set_octave(octave);
        }
        if let Some(duration) = self.duration {
            settings.set_duration_bars(duration);
        }
        if let Some(velocity) = self.velocity {
            settings.set_velocity(velocity);
        }
        if let Some(style) = &self.style {
            settings.set_play_style(style.parse().map_err(ChordGenError::SettingsError)?);
        }
        if let Some(speed) = &self.arp_speed {
            settings.set_arp_speed(speed.parse().map_err(ChordGenError::SettingsError)?);
        }
        Ok(())
    }
}

/// Split optional YAML front matter off the top of `text`.
///
/// Returns the parsed front matter (if any) and the remaining body. The block
/// must open and close with lines that are exactly `---`. A block that is not
/// a mapping of known settings keys (a markdown rule around pasted prose, a
/// YAML list of chords) is not front matter: the whole text is returned as the
/// body. Only a bad value for a known key is an error.
pub fn split_front_matter(text: &str) -> Result<(Option<RawSettings>, &str), ChordGenError> {
    let Some((yaml, body)) = front_matter_block(text) else {
        return Ok((None, text));
    };

    let value: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(value) => value,
        Err(e) => {
            debug!(%e, "leading block is not YAML, parsing it as text");
            return Ok((None, text));
        }
    };

    match &value {
        serde_yaml::Value::Null => return Ok((Some(RawSettings::default()), body)),
        serde_yaml::Value::Mapping(mapping)
            if mapping
                .keys()
                .all(|key| key.as_str().is_some_and(|k| FRONT_MATTER_KEYS.contains(&k))) => {}
        _ => {
            debug!("leading block is not settings front matter, parsing it as text");
            return Ok((None, text));
        }
    }

    let raw = serde_yaml::from_value(value).map_err(|e| ChordGenError::SettingsError(e.to_string()))?;
    Ok((Some(raw), body))
}

/// The YAML between a leading `---` line and the next `---` line, and the
/// text after the closing line.
fn front_matter_block(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let opening = lines.next()?;
    if opening.trim_end() != "---" {
        return None;
    }

    let yaml_start = opening.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some((&text[yaml_start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_persisted_defaults() {
        let settings = PlaybackSettings::default();
        assert_eq!(settings.octave(), 4);
        assert_eq!(settings.duration_bars(), 1.0);
        assert_eq!(settings.velocity(), 100);
        assert_eq!(settings.play_style().ordinal(), 0);
        assert_eq!(settings.arp_speed().ordinal(), 1);
    }

    #[test]
    fn test_setters_clamp() {
        let mut settings = PlaybackSettings::default();
        settings.set_octave(12);
        settings.set_duration_bars(0.0);
        settings.set_velocity(0);
        assert_eq!(settings.octave(), 8);
        assert_eq!(settings.duration_bars(), 0.25);
        assert_eq!(settings.velocity(), 1);

        settings.set_octave(-3);
        settings.set_duration_bars(40.0);
        settings.set_velocity(300);
        assert_eq!(settings.octave(), 0);
        assert_eq!(settings.duration_bars(), 16.0);
        assert_eq!(settings.velocity(), 127);
    }

    #[test]
    fn test_config_converts_bars_to_beats() {
        let mut settings = PlaybackSettings::default();
        settings.set_duration_bars(0.5);
        let config = settings.config(22050, 10);
        assert_eq!(config.duration_in_beats, 2.0);
        assert_eq!(config.samples_per_beat, 22050);
        assert_eq!(config.start_sample, 10);
    }

    #[test]
    fn test_state_round_trip() {
        let mut settings = PlaybackSettings::default();
        settings.set_octave(2);
        settings.set_duration_bars(2.5);
        settings.set_velocity(64);
        settings.set_play_style(PlayStyle::Arpeggio);
        settings.set_arp_speed(ArpSpeed::Quarter);

        let xml = settings.to_state_xml().unwrap();
        assert!(xml.starts_with("<ChordGenState"));
        assert_eq!(PlaybackSettings::from_state_xml(&xml), settings);
    }

    #[test]
    fn test_state_with_missing_and_corrupt_fields() {
        let settings = PlaybackSettings::from_state_xml(
            r#"<?xml version="1.0"?><ChordGenState duration="abc" arpSpeed="9" playStyle="1"></ChordGenState>"#,
        );
        assert_eq!(settings.octave(), 4);
        assert_eq!(settings.duration_bars(), 1.0);
        assert_eq!(settings.arp_speed(), ArpSpeed::Sixteenth);
        assert_eq!(settings.play_style(), PlayStyle::Arpeggio);
    }

    #[test]
    fn test_state_from_plugin_host_is_accepted() {
        let settings = PlaybackSettings::from_state_xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<AIChordGeneratorState octave="3" duration="0.5" velocity="90" playStyle="1" arpSpeed="2"/>"#,
        );
        assert_eq!(settings.octave(), 3);
        assert_eq!(settings.duration_bars(), 0.5);
        assert_eq!(settings.velocity(), 90);
        assert_eq!(settings.play_style(), PlayStyle::Arpeggio);
        assert_eq!(settings.arp_speed(), ArpSpeed::Eighth);
    }

    #[test]
    fn test_state_garbage_gives_defaults() {
        assert_eq!(PlaybackSettings::from_state_xml(""), PlaybackSettings::default());
        assert_eq!(
            PlaybackSettings::from_state_xml(r#"<OtherPlugin octave="1"/>"#),
            PlaybackSettings::default()
        );
        assert_eq!(PlaybackSettings::from_state_xml("not xml at all"), PlaybackSettings::default());
    }

    #[test]
    fn test_front_matter_parsed_and_stripped() {
        let text = "---\noctave: 3\nstyle: arpeggio\narp-speed: 1/8\ntempo: 96\n---\nAm F C G\n";
        let (raw, body) = split_front_matter(text).unwrap();
        let raw = raw.unwrap();
        assert_eq!(raw.octave, Some(3));
        assert_eq!(raw.tempo, Some(96.0));
        assert_eq!(body, "Am F C G\n");

        let mut settings = PlaybackSettings::default();
        raw.apply(&mut settings).unwrap();
        assert_eq!(settings.octave(), 3);
        assert_eq!(settings.play_style(), PlayStyle::Arpeggio);
        assert_eq!(settings.arp_speed(), ArpSpeed::Eighth);
    }

    #[test]
    fn test_no_front_matter() {
        let (raw, body) = split_front_matter("Am F C G").unwrap();
        assert!(raw.is_none());
        assert_eq!(body, "Am F C G");

        let (raw, body) = split_front_matter("---\nAm F C G").unwrap();
        assert!(raw.is_none());
        assert_eq!(body, "---\nAm F C G");
    }

    #[test]
    fn test_leading_rule_around_prose_is_not_front_matter() {
        let text = "---\nTry: Am, F, C\n---\nG";
        assert_eq!(split_front_matter(text).unwrap(), (None, text));

        let text = "---\n- Am\n- F\n---\nC G";
        assert_eq!(split_front_matter(text).unwrap(), (None, text));

        let text = "---\noctave: [\n---\nC";
        assert_eq!(split_front_matter(text).unwrap(), (None, text));

        let text = "---\noctave: 3\ncomment: moody\n---\nC";
        assert_eq!(split_front_matter(text).unwrap(), (None, text));
    }

    #[test]
    fn test_closing_marker_must_stand_alone() {
        let text = "---\noctave: 3\n--- Am F\nC";
        assert_eq!(split_front_matter(text).unwrap(), (None, text));

        let (raw, body) = split_front_matter("---\r\noctave: 3\r\n---\r\nAm F").unwrap();
        assert_eq!(raw.unwrap().octave, Some(3));
        assert_eq!(body, "Am F");
    }

    #[test]
    fn test_unknown_keys_are_rejected_by_raw_settings() {
        assert!(serde_yaml::from_str::<RawSettings>("octave: 3\nmood: dark").is_err());
    }

    #[test]
    fn test_empty_front_matter() {
        let (raw, body) = split_front_matter("---\n---\nC G").unwrap();
        assert_eq!(raw, Some(RawSettings::default()));
        assert_eq!(body, "C G");
    }

    #[test]
    fn test_invalid_front_matter() {
        assert!(matches!(
            split_front_matter("---\noctave: loud\n---\nC"),
            Err(ChordGenError::SettingsError(_))
        ));

        let (raw, _) = split_front_matter("---\nstyle: strum\n---\nC").unwrap();
        let mut settings = PlaybackSettings::default();
        assert!(matches!(
            raw.unwrap().apply(&mut settings),
            Err(ChordGenError::SettingsError(_))
        ));
    }
}

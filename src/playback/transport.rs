//! Tempo and sample-rate bookkeeping
//!
//! The event generator works in samples; the host works in seconds and BPM.
//! `Transport` converts between the two.

use serde::Serialize;

use crate::error::ChordGenError;

/// Tempo used when the host does not report one
pub const DEFAULT_BPM: f64 = 120.0;

/// Beats per bar (4/4 time)
pub const BEATS_PER_BAR: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    pub sample_rate: f64,
    pub bpm: f64,
}

impl Transport {
    /// Build a transport from the host's sample rate and optional tempo.
    ///
    /// A missing or non-positive tempo falls back to [`DEFAULT_BPM`]. The
    /// sample rate must be positive and large enough for a beat to last at
    /// least one sample.
    ///
    /// # Examples
    /// ```
    /// use chordgen::playback::Transport;
    ///
    /// let transport = Transport::new(44100.0, None).unwrap();
    /// assert_eq!(transport.samples_per_beat(), 22050);
    ///
    /// let transport = Transport::new(48000.0, Some(90.0)).unwrap();
    /// assert_eq!(transport.samples_per_beat(), 32000);
    ///
    /// assert!(Transport::new(0.0, Some(120.0)).is_err());
    /// ```
    pub fn new(sample_rate: f64, bpm: Option<f64>) -> Result<Self, ChordGenError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ChordGenError::TimingError(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }

        let bpm = match bpm {
            Some(bpm) if bpm > 0.0 && bpm.is_finite() => bpm,
            _ => DEFAULT_BPM,
        };

        let transport = Self { sample_rate, bpm };
        if transport.samples_per_beat() == 0 {
            return Err(ChordGenError::TimingError(format!(
                "{} BPM at {} Hz is shorter than one sample per beat",
                bpm, sample_rate
            )));
        }
        Ok(transport)
    }

    /// Quarter-note length in whole samples (truncated)
    pub fn samples_per_beat(&self) -> u64 {
        ((60.0 / self.bpm) * self.sample_rate) as u64
    }

    /// Length of `bars` bars in samples (truncated)
    pub fn bars_to_samples(&self, bars: f64) -> u64 {
        (bars * BEATS_PER_BAR * self.samples_per_beat() as f64) as u64
    }
}

//! Audio cues
//!
//! UI feedback sounds. Each cue maps to a fixed tone; the player only
//! describes the tone (and optionally rings the terminal bell), it does not
//! synthesize audio.

use std::io::Write;
use std::time::Duration;

/// Feedback cues emitted by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Mechanical click for key presses and taps
    Click,
    /// Softer click for virtual keyboard presses
    Type,
    /// Ascending chime when the home screen is reached
    Unlock,
    Error,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// Tone description for a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    /// Equal to `start_hz` for flat tones
    pub end_hz: f32,
    pub waveform: Waveform,
    pub duration: Duration,
    pub volume: f32,
}

impl Cue {
    pub fn tone(&self) -> Tone {
        match self {
            Cue::Click => Tone {
                start_hz: 800.0,
                end_hz: 800.0,
                waveform: Waveform::Square,
                duration: Duration::from_millis(50),
                volume: 0.05,
            },
            Cue::Type => Tone {
                start_hz: 600.0,
                end_hz: 600.0,
                waveform: Waveform::Sine,
                duration: Duration::from_millis(30),
                volume: 0.05,
            },
            Cue::Unlock => Tone {
                start_hz: 400.0,
                end_hz: 800.0,
                waveform: Waveform::Sine,
                duration: Duration::from_millis(300),
                volume: 0.1,
            },
            Cue::Error => Tone {
                start_hz: 150.0,
                end_hz: 150.0,
                waveform: Waveform::Sawtooth,
                duration: Duration::from_millis(200),
                volume: 0.1,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cue::Click => "click",
            Cue::Type => "type",
            Cue::Unlock => "unlock",
            Cue::Error => "error",
        }
    }
}

/// Fire-and-forget consumer of cues
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Audio configuration
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Master volume (0-100)
    pub volume: u8,
    pub muted: bool,
    /// Ring the terminal bell for clicks
    pub bell: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 70,
            muted: false,
            bell: false,
        }
    }
}

/// Cue player used by the launcher
pub struct CuePlayer {
    config: AudioConfig,
    played: u64,
}

impl CuePlayer {
    pub fn new(config: AudioConfig) -> Self {
        Self { config, played: 0 }
    }

    /// Effective output gain for a cue (0.0 when muted)
    pub fn gain(&self, cue: Cue) -> f32 {
        if self.config.muted {
            return 0.0;
        }
        cue.tone().volume * f32::from(self.config.volume.min(100)) / 100.0
    }

    /// Number of cues played so far
    pub fn played(&self) -> u64 {
        self.played
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.config.muted = muted;
    }
}

impl CueSink for CuePlayer {
    fn play(&mut self, cue: Cue) {
        self.played += 1;
        let tone = cue.tone();
        let gain = self.gain(cue);
        tracing::debug!(
            "Cue {}: {:?} {}-{} Hz for {:?} at gain {:.3}",
            cue.name(),
            tone.waveform,
            tone.start_hz,
            tone.end_hz,
            tone.duration,
            gain
        );

        if self.config.bell && gain > 0.0 && cue == Cue::Click {
            let mut stderr = std::io::stderr();
            if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
                tracing::warn!("Failed to ring terminal bell: {}", e);
            }
        }
    }
}

impl Default for CuePlayer {
    fn default() -> Self {
        Self::new(AudioConfig::default())
    }
}

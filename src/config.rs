//! Engine configuration.
//!
//! Defaults reproduce the embedded piano: a 1 s plucked note with a 10 ms
//! attack to 70% of the volume, a 200 ms key flash, sine waves, octave 4.

use std::{ops::RangeInclusive, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::oscillator::Waveform,
    error::{Error, Result},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Total sounding time of every voice; also the disposal delay.
    pub voice_duration: Duration,
    /// Linear ramp from silence to the peak.
    pub attack: Duration,
    /// Peak level as a fraction of the volume control.
    pub peak_scale: f32,
    /// Level the exponential decay aims for at the end of the voice.
    pub decay_floor: f32,
    /// How long a triggered key stays visibly pressed.
    pub pressed_flash: Duration,
    pub initial_volume: f32,
    pub initial_waveform: Waveform,
    pub default_octave: i32,
    /// Range accepted by the default-octave control.
    pub octave_range: RangeInclusive<i32>,
    /// Audio clock rate used until a device reports its own.
    pub sample_rate: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voice_duration: Duration::from_millis(1000),
            attack: Duration::from_millis(10),
            peak_scale: 0.7,
            decay_floor: 0.001,
            pressed_flash: Duration::from_millis(200),
            initial_volume: 0.7,
            initial_waveform: Waveform::Sine,
            default_octave: 4,
            octave_range: 0..=8,
            sample_rate: 48_000.0,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voice_duration(mut self, duration: Duration) -> Self {
        self.voice_duration = duration;
        self
    }

    pub fn attack(mut self, attack: Duration) -> Self {
        self.attack = attack;
        self
    }

    pub fn pressed_flash(mut self, flash: Duration) -> Self {
        self.pressed_flash = flash;
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume;
        self
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.initial_waveform = waveform;
        self
    }

    pub fn default_octave(mut self, octave: i32) -> Self {
        self.default_octave = octave;
        self
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.voice_duration.is_zero() {
            return Err(Error::InvalidConfig("voice duration must be positive".into()));
        }
        if self.attack.is_zero() || self.attack >= self.voice_duration {
            return Err(Error::InvalidConfig(format!(
                "attack {:?} must be positive and shorter than the voice ({:?})",
                self.attack, self.voice_duration
            )));
        }
        if !(self.decay_floor > 0.0) {
            return Err(Error::InvalidConfig("decay floor must be above zero".into()));
        }
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(Error::InvalidConfig(format!(
                "volume {} outside [0, 1]",
                self.initial_volume
            )));
        }
        if self.octave_range.is_empty() {
            return Err(Error::InvalidConfig("empty octave range".into()));
        }
        if !(self.sample_rate > 0.0) {
            return Err(Error::InvalidConfig("sample rate must be positive".into()));
        }
        Ok(())
    }
}

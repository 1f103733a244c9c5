use std::ops::RangeInclusive;

use tracing::warn;

use crate::{config::EngineConfig, dsp::oscillator::Waveform};

/// User-facing settings read when a voice is built.
///
/// Changes only reach voices triggered afterwards; the master level is the
/// exception and is pushed to the backend by the engine.
#[derive(Debug, Clone)]
pub struct ControlState {
    volume: f32,
    waveform: Waveform,
    default_octave: i32,
    octave_range: RangeInclusive<i32>,
    backend_ready: bool,
}

impl ControlState {
    pub fn new(config: &EngineConfig) -> Self {
        let octave_range = config.octave_range.clone();
        Self {
            volume: config.initial_volume.clamp(0.0, 1.0),
            waveform: config.initial_waveform,
            default_octave: clamp_octave(config.default_octave, &octave_range),
            octave_range,
            backend_ready: false,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn default_octave(&self) -> i32 {
        self.default_octave
    }

    pub fn backend_ready(&self) -> bool {
        self.backend_ready
    }

    /// Volume as a fraction; clamped to [0, 1], NaN ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            warn!("ignoring NaN volume");
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Volume slider position 0..=100.
    pub fn set_volume_percent(&mut self, percent: i32) {
        self.volume = percent.clamp(0, 100) as f32 / 100.0;
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Default octave, clamped to the configured control range.
    pub fn set_default_octave(&mut self, octave: i32) {
        let clamped = clamp_octave(octave, &self.octave_range);
        if clamped != octave {
            warn!(octave, clamped, "default octave outside control range");
        }
        self.default_octave = clamped;
    }

    /// Flips once; there is no way back.
    pub(crate) fn mark_backend_ready(&mut self) {
        self.backend_ready = true;
    }
}

fn clamp_octave(octave: i32, range: &RangeInclusive<i32>) -> i32 {
    octave.max(*range.start()).min(*range.end())
}

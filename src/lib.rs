pub mod config;
pub mod dsp;
pub mod engine; // Wall-clock timers
pub mod error;
pub mod graph; // Synthesis nodes and the audio backend capability
pub mod io;
pub mod notes;
pub mod synth; // Voices and the piano engine

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use synth::PianoEngine;

pub const MAX_BLOCK_SIZE: usize = 2048;

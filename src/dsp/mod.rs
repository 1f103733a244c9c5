//! Low-level DSP primitives used by the synthesis graph.
//!
//! These components are allocation-free once built, so the audio callback
//! can evaluate them directly. They stay focused on signal math; node
//! scheduling and routing live in [`crate::graph`].

/// Breakpoint amplitude programs with linear and exponential ramps.
pub mod envelope;
/// Oscillator waveforms.
pub mod oscillator;

pub use envelope::{EnvelopeProgram, Ramp};
pub use oscillator::Waveform;

//! The synthesis capability the piano engine drives.
//!
//! The engine never renders audio itself. It asks a backend for nodes,
//! wires them `oscillator -> gain -> master`, schedules automation against
//! the backend's audio clock, and later hands the nodes back. [`Graph`]
//! implements this in-process; the device backend wraps a `Graph` in an
//! output stream.
//!
//! [`Graph`]: crate::graph::Graph

use crate::dsp::{envelope::EnvelopeProgram, oscillator::Waveform};
use crate::error::Result;

/// Opaque handle to a node owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

/// Where a node's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Into an amplitude-control node.
    Node(NodeId),
    /// Into the shared master stage.
    Master,
}

pub trait AudioBackend {
    /// Build the graph root and the master stage. Calling it again once it
    /// has succeeded does nothing.
    fn initialize(&mut self, master_gain: f32) -> Result<()>;

    fn is_initialized(&self) -> bool;

    /// Monotonic audio-clock time in seconds.
    fn current_time(&self) -> f64;

    /// Master level; applies to everything currently sounding.
    fn set_master_gain(&mut self, gain: f32);

    fn create_oscillator(&mut self, waveform: Waveform, frequency: f64) -> Result<NodeId>;

    fn create_gain(&mut self) -> Result<NodeId>;

    fn connect(&mut self, node: NodeId, destination: Destination) -> Result<()>;

    /// Run `program` on a gain node, with offset 0 at audio time `start`.
    fn schedule_envelope(
        &mut self,
        gain: NodeId,
        program: &EnvelopeProgram,
        start: f64,
    ) -> Result<()>;

    fn start(&mut self, oscillator: NodeId, at: f64) -> Result<()>;

    fn stop(&mut self, oscillator: NodeId, at: f64) -> Result<()>;

    /// Disconnect and drop a node.
    fn release(&mut self, node: NodeId) -> Result<()>;
}

//! Synthesis graph: the nodes a voice allocates and the root that mixes them.
//!
//! Every voice is an oscillator feeding its own amplitude-control node,
//! which feeds the shared master stage. [`backend::AudioBackend`] is the
//! capability the engine programs against; [`Graph`] is the in-process
//! implementation, and `device::CpalBackend` plays a `Graph` on the output
//! device.

/// The synthesis capability trait and node handles.
pub mod backend;
/// Output-device backend (cpal).
#[cfg(feature = "cpal")]
pub mod device;
/// Amplitude-control node driven by envelope programs.
pub mod gain;
/// Core traits shared by all graph nodes.
pub mod node;
/// Offline graph root with a sample-counting audio clock.
pub mod offline;
/// Oscillator with start/stop scheduled on the audio clock.
pub mod oscillator;

pub use backend::{AudioBackend, Destination, NodeId};
pub use node::{GraphNode, RenderCtx};
pub use offline::Graph;

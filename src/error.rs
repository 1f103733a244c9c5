//! Error types for keytone.

use thiserror::Error;

use crate::graph::backend::NodeId;

/// Result type alias for keytone operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving the synthesis graph.
#[derive(Debug, Error)]
pub enum Error {
    /// No output device, or the host refused to open one.
    #[error("Audio backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The output stream could not be built or started.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// A node handle that the backend does not (or no longer) own.
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Connection not allowed by the voice topology.
    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    /// Envelope breakpoints out of order or unreachable targets.
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Waveform name that is not one of sine/square/sawtooth/triangle.
    #[error("Unknown waveform: {0}")]
    UnknownWaveform(String),

    /// Invalid configuration parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

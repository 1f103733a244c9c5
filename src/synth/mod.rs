// Purpose: voices, their registry, user controls and the engine that ties them together
// This layer sits above the graph backend and the wall-clock timers

pub mod control;
pub mod engine;
pub mod registry;
pub mod voice;

pub use control::ControlState;
pub use engine::PianoEngine;
pub use registry::VoiceRegistry;
pub use voice::{Voice, VoiceId, VoiceState};

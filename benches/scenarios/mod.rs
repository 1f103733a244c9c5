//! Real-world scenario benchmarks.
//!
//! Whole voices through the graph, the way the piano plays them.

mod chord;
mod trigger;

pub use chord::bench_chord;
pub use trigger::bench_trigger;

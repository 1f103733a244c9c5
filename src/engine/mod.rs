// Purpose: event-loop timing (wall clock and timer queue)
// Audio-clock scheduling lives in the graph; this side handles everything
// the host event loop fires later: voice disposal and pressed-key flashes.

pub mod clock;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::Scheduler;

//! Sun evaluation sweeps and the scene session that hosts them.
//!
//! Ties the other crates together: the session owns camera placement, the
//! tile cache, and the memory monitor with an explicit per-frame ordering;
//! the sweep walks a grid of local time slots, renders the shadow state for
//! each, and records per-area sunlit percentages.

mod error;
mod session;
mod slots;
mod store;
mod sweep;

pub use error::{RenderError, SessionError, SweepError};
pub use session::SceneSession;
pub use slots::{TimeSlot, slot_grid};
pub use store::{MemorySampleStore, SampleStore, SunEvalSample};
pub use sweep::{ShadowRenderer, SweepReport, run_sweep};

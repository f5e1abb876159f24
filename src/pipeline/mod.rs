//! Poll–diff–notify pipeline.
//!
//! - `ChangeDetector`: decides whether fetched data differs from the snapshot
//! - `Dispatcher`: formats and sends one notification per change
//! - `CycleRunner`: fetch, detect, notify and persist, one cycle at a time
//! - `Scheduler`: runs cycles at startup and on a fixed period

pub mod cycle;
pub mod detect;
pub mod dispatch;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use cycle::{CycleReport, CycleRunner, FeedOutcome};
pub use detect::{ChangeDetector, detect_restock};
pub use dispatch::Dispatcher;
pub use scheduler::Scheduler;

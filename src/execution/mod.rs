//! Execution support for PrismDB
//!
//! Statement-scoped context and the shared lock subsystem that expression
//! evaluation relies on.

pub mod context;
pub mod lock;

pub use context::*;
pub use lock::{LockSubsystem, ReleaseOutcome};

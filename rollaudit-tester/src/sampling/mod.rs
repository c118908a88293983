//! Concurrent batch sampling and the looping session that drives it.

pub mod batch;
pub mod session;
pub mod signal;

pub use batch::DEFAULT_CONCURRENCY;
pub use session::{DEFAULT_BATCH_SIZE, SessionConfig, SessionSummary, run_session};
pub use signal::{StopSignal, stop_on_ctrl_c};

//! Fan-Out Orchestrator (C7): the source descriptor table, per-source state
//! machine, and the concurrent fan-out driver.

pub mod fanout;
pub mod sources;

pub use fanout::{run, run_streaming, FanOutInput, FanOutOutcome};

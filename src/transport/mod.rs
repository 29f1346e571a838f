//! Batch (C10) and streaming (C11) transports over the same fan-out runtime.

pub mod batch;
pub mod stream;

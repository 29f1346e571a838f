//! Unified media search and autocomplete service.
//!
//! See `SPEC_FULL.md` for the component map (C1-C12). This crate wires a
//! `tantivy`-backed index (C1-C5), brokered provider adapters (C6), a
//! concurrent fan-out orchestrator (C7), exact-match arbitration and
//! popularity normalization (C8-C9), and batch/streaming HTTP transports
//! (C10-C11) into a single `axum` service.

pub mod api;
pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod index;
pub mod models;
pub mod orchestrator;
pub mod providers;
pub mod query;
pub mod scoring;
pub mod services;
pub mod transport;

pub use app::{build_app, AppState};
pub use error::{AppError, Result};

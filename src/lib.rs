//! Back-solve plausible 2x2 confusion matrices from reported diagnostic
//! accuracy statistics.
//!
//! The [`estimate`] module holds the exhaustive search; [`session`] is the
//! shell that validates input and keeps run history for the CLI and the
//! HTTP API.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod estimate;
pub mod logging;
pub mod report;
pub mod session;

pub use error::{EstimateError, Result};

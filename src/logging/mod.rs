//! Structured logging with parse context.
//!
//! Provides the logging context that carries parse_id and device id into
//! every log message for easy correlation.

pub mod structured;

pub use structured::*;

//! Pipeline orchestration module.
//!
//! Main report ingestion pipeline that coordinates:
//! - Unreachable-device detection
//! - Banner segmentation
//! - Inventory harvest
//! - Per-block section extraction
//! - Summary rollup

pub mod context;
pub mod ingest;
pub mod segmenter;

pub use context::*;
pub use ingest::*;

//! NOCLens Core - Nokia NSP inventory-report parsing pipeline
//!
//! This crate provides the core report processing functionality for NOCLens,
//! exposed to Python via PyO3. The implementation prioritizes:
//!
//! 1. **Tolerance** - Sections and fields degrade independently, never fatally
//! 2. **Logging** - Every decision point logged with full context
//! 3. **Performance** - Zero-copy segmentation, parallel per-device extraction
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `pipeline` - Main ingestion orchestrator (segmentation, fan-out, merge)
//! - `extraction` - Per-section field extractors for the CLI dialects
//! - `resolve` - Site and hardware-model resolution from naming conventions
//! - `summary` - Per-device rollup and health classification
//! - `lookup` - Cross-source service lookup against reference spreadsheets
//! - `records` - Typed record tables and derived reports
//! - `logging` - Structured logging with parse context

pub mod extraction;
pub mod logging;
pub mod lookup;
pub mod pipeline;
pub mod records;
pub mod resolve;
pub mod summary;

#[cfg(feature = "python")]
mod python;

pub use pipeline::ingest::{parse, parse_with_context};
pub use records::ParseResult;
pub use summary::health::HealthState;

//! Cross-source service lookup.
//!
//! Resolves service ids against the caller-loaded reference catalog:
//! - Catalog construction and format classification
//! - Two-source search with generic any-column fallback
//! - `CI`/`CO` tracking-code extraction

pub mod catalog;
pub mod code;
pub mod resolve;

pub use catalog::*;
pub use code::*;
pub use resolve::*;

//! Summary layer.
//!
//! Rolls the per-device record tables up into one summary row per
//! inventoried device:
//! - Port / service counters
//! - Site and model resolution
//! - Health classification

pub mod aggregate;
pub mod health;

pub use aggregate::*;
pub use health::*;

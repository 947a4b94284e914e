//! Naming-convention resolvers.
//!
//! Site and hardware-model resolution from device identifiers and chassis
//! fields. Both are part of the public contract: the presentation layer
//! calls them directly for export features.

pub mod device_type;
pub mod site;

pub use device_type::{resolve_device_type, validate_device_type};
pub use site::{extract_site_code, normalize_site};

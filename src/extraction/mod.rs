//! Field extraction module.
//!
//! One extractor per record table, each scoped to its command section and
//! tolerant of the dialect differences between report generations. The
//! unreachable detector is the odd one out: it scans the whole report, not
//! a single block.

pub mod chassis;
pub mod mda;
pub mod port_desc;
pub mod ports;
pub mod section;
pub mod services;
pub mod unreachable;
pub mod version;

pub use chassis::extract_chassis;
pub use mda::extract_modules;
pub use port_desc::extract_port_descriptions;
pub use ports::extract_ports;
pub use services::extract_services;
pub use unreachable::detect_unreachable;
pub use version::extract_version;

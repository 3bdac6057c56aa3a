//! Pipeline module - loading, aggregation, segmentation and lookup

pub mod aggregate;
pub mod config;
pub mod error;
pub mod loader;
pub mod profile;
pub mod record;
pub mod segment;
pub mod table;

pub use aggregate::*;
pub use config::*;
pub use error::*;
pub use loader::*;
pub use profile::*;
pub use record::*;
pub use segment::*;
pub use table::*;

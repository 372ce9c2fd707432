//! nb-init: populate NetBox from netbox-initializers style YAML files
//!
//! Each `<resource>.yml` file in the initializer directory holds the records of
//! one NetBox collection. Records are upserted one at a time, in dependency
//! order, and every outcome is reported without stopping the run.

pub mod cli;
pub mod config;
pub mod error;
pub mod initializer;
pub mod loader;
pub mod netbox;
pub mod record;
pub mod report;
pub mod resource;

pub use error::{ConfigError, FileError, RecordError};
pub use initializer::Initializer;
pub use record::{Lookup, Record};
pub use resource::Resource;

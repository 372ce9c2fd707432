//! Configuration loading and merging
//!
//! Handles loading from the config file and merging it under the CLI flags and
//! environment variables with proper precedence (CLI > Env > File > Defaults).

pub mod loader;
pub mod merge;
pub mod settings;

pub use loader::{load_config, DEFAULT_CONFIG_FILE};
pub use merge::{merge_cli_with_config, CliOverrides};
pub use settings::{Auth, FileConfig, ResolvedConfig};

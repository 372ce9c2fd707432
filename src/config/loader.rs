//! Config file loading

use super::settings::FileConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "nb-init.yaml";

/// Top-level section the settings may be nested under.
const NESTED_SECTION: &str = "nb-init";

/// Load the config file.
///
/// An explicitly given path must exist and parse. Without one,
/// `nb-init.yaml` in `base_dir` is used if present; a broken default file is
/// logged and ignored.
pub fn load_config(base_dir: &Path, config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let config_path_provided = config_path.is_some();

    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => base_dir.join(DEFAULT_CONFIG_FILE),
    };

    if !config_path_provided && !config_file.exists() {
        return Ok(FileConfig::default());
    }

    let content = fs::read_to_string(&config_file)
        .map_err(|source| ConfigError::Read { path: config_file.clone(), source });
    let parsed = content.and_then(|content| parse_yaml_config(&content, &config_file));

    match parsed {
        Ok(cfg) => {
            tracing::debug!("Loaded config file {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            // Auto-discovered: warn and fall back to defaults
            tracing::warn!("Ignoring config file {}: {}", config_file.display(), e);
            Ok(FileConfig::default())
        }
    }
}

/// Parse YAML config, supporting a nested `nb-init` section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<FileConfig, ConfigError> {
    let parse_err = |source| ConfigError::Parse { path: config_file.to_path_buf(), source };

    let raw: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_err)?;

    // An empty file is an empty config
    if raw.is_null() {
        return Ok(FileConfig::default());
    }

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val).map_err(parse_err)
}

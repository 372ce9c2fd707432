//! Merging of CLI/environment values with the config file

use super::settings::{Auth, FileConfig, ResolvedConfig};
use crate::error::ConfigError;
use crate::loader::DEFAULT_YAML_DIR;
use std::path::PathBuf;

/// Values given on the command line. clap has already filled in environment
/// variables for flags that were not passed.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub yaml_dir: Option<PathBuf>,
}

/// Layer the CLI values over the config file and pick an auth method.
///
/// A token wins over username/password when both are available.
pub fn merge_cli_with_config(
    cli: CliOverrides,
    file: FileConfig,
) -> Result<ResolvedConfig, ConfigError> {
    let url = first_set(cli.url, file.url).ok_or(ConfigError::MissingUrl)?;
    let token = first_set(cli.token, file.token);
    let username = first_set(cli.username, file.username);
    let password = first_set(cli.password, file.password);

    let auth = match (token, username, password) {
        (Some(token), username, password) => {
            if username.is_some() || password.is_some() {
                tracing::info!("Token given; ignoring username/password");
            }
            Auth::Token(token)
        }
        (None, Some(username), Some(password)) => Auth::Credentials { username, password },
        _ => return Err(ConfigError::MissingAuth),
    };

    let yaml_dir = cli
        .yaml_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .or(file.yaml_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_YAML_DIR));

    Ok(ResolvedConfig { url: url.trim().to_string(), auth, yaml_dir })
}

fn first_set(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    non_empty(preferred).or_else(|| non_empty(fallback))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//! Error types for nb-init.
//!
//! Three kinds of failure exist, and they differ in how far they reach:
//! a [`ConfigError`] stops the run before any API call, a [`FileError`] is
//! fatal only when the initializer directory itself is missing, and a
//! [`RecordError`] is reported and skipped.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration could not be resolved into something usable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NetBox URL is required (use --url, NB_URL or `url` in the config file)")]
    MissingUrl,

    #[error("either a token or a username and password must be provided")]
    MissingAuth,

    #[error("failed reading config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("authentication against NetBox failed: {0}")]
    Authentication(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Problems with the initializer directory or one of its files.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("initializer directory not found: {}", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("failed reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A single record could not be pushed. Never aborts the run.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid record: {0}")]
    Validation(String),

    #[error("record has no `{0}` field to identify it")]
    MissingKey(&'static str),

    #[error("{count} existing objects match {field}={value}")]
    Ambiguous {
        field: &'static str,
        value: String,
        count: u64,
    },

    #[error("no {resource} found with {field}={value}")]
    NotFound {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("NetBox returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(String),
}

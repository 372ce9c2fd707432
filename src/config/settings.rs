//! Configuration types

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;

/// Values read from `nb-init.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(deserialize_with = "scalar_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub password: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub token: Option<String>,
    pub yaml_dir: Option<PathBuf>,
}

/// Accept numbers and booleans where a string is expected, so that
/// `password: 123456` in YAML still reads as the string "123456".
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        String(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::String(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// How the session authenticates against NetBox.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    Token(String),
    /// A token is provisioned for these credentials and revoked afterwards.
    Credentials { username: String, password: String },
}

impl Auth {
    pub fn method(&self) -> &'static str {
        match self {
            Auth::Token(_) => "token",
            Auth::Credentials { .. } => "username/password",
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
            Auth::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub url: String,
    pub auth: Auth,
    pub yaml_dir: PathBuf,
}

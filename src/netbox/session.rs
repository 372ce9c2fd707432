//! Authenticated NetBox session

use super::{HttpNetbox, ObjectId};
use crate::config::{Auth, ResolvedConfig};
use crate::error::ConfigError;
use serde::Deserialize;
use serde_json::json;

const PROVISION_PATH: &str = "users/tokens/provision";

#[derive(Debug, Deserialize)]
struct ProvisionedToken {
    id: ObjectId,
    key: String,
}

/// An API handle plus the token it owns, if any.
///
/// With username/password auth a token is provisioned on connect and deleted
/// again when the session is closed or dropped.
pub struct Session {
    api: HttpNetbox,
    provisioned: Option<ObjectId>,
}

impl Session {
    pub fn connect(config: &ResolvedConfig) -> Result<Self, ConfigError> {
        let api = HttpNetbox::new(&config.url)?;
        Self::authenticate(api, &config.auth)
    }

    fn authenticate(api: HttpNetbox, auth: &Auth) -> Result<Self, ConfigError> {
        match auth {
            Auth::Token(token) => {
                tracing::info!("Using token authentication against {}", api.base_url());
                Ok(Self { api: api.with_token(token.clone()), provisioned: None })
            }
            Auth::Credentials { username, password } => {
                let token = provision_token(&api, username, password)?;
                tracing::info!("Provisioned API token {} for {}", token.id, username);
                Ok(Self { api: api.with_token(token.key), provisioned: Some(token.id) })
            }
        }
    }

    pub fn api(&self) -> &HttpNetbox {
        &self.api
    }

    pub fn close(mut self) {
        self.revoke();
    }

    fn revoke(&mut self) {
        let Some(id) = self.provisioned.take() else {
            return;
        };
        let url = self.api.url(&format!("users/tokens/{id}"));
        match self.api.execute(self.api.http().delete(&url)) {
            Ok(_) => tracing::info!("Deleted provisioned API token {}", id),
            Err(e) => tracing::warn!("Failed to delete provisioned API token {}: {}", id, e),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.revoke();
    }
}

fn provision_token(
    api: &HttpNetbox,
    username: &str,
    password: &str,
) -> Result<ProvisionedToken, ConfigError> {
    let url = api.url(PROVISION_PATH);
    let body = api
        .execute(api.http().post(&url).json(&json!({ "username": username, "password": password })))
        .map_err(|e| ConfigError::Authentication(e.to_string()))?
        .ok_or_else(|| ConfigError::Authentication("empty token provisioning response".to_string()))?;

    serde_json::from_value(body)
        .map_err(|e| ConfigError::Authentication(format!("unexpected token response: {e}")))
}

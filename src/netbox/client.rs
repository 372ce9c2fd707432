//! Blocking HTTP implementation of [`NetboxApi`]

use super::{NetboxApi, ObjectId};
use crate::error::{ConfigError, RecordError};
use crate::record::Lookup;
use crate::resource::Resource;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;

const USER_AGENT: &str = concat!("nb-init/", env!("CARGO_PKG_VERSION"));

// Error bodies from NetBox can be whole HTML pages; keep reports readable.
const ERROR_BODY_LIMIT: usize = 500;

/// Normalize a NetBox URL to its API root.
///
/// - `https://netbox.example.com`      → `https://netbox.example.com/api`
/// - `https://netbox.example.com/`     → `https://netbox.example.com/api`
/// - `https://netbox.example.com/api/` → `https://netbox.example.com/api`
pub fn api_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/api")
    }
}

#[derive(Deserialize)]
struct Page {
    count: u64,
    results: Vec<ObjectRef>,
}

#[derive(Deserialize)]
struct ObjectRef {
    id: ObjectId,
}

pub struct HttpNetbox {
    client: Client,
    base: String,
    token: Option<String>,
}

impl HttpNetbox {
    pub fn new(url: &str) -> Result<Self, ConfigError> {
        let client = Client::builder().user_agent(USER_AGENT).build().map_err(ConfigError::Client)?;
        Ok(Self::from_client(client, url))
    }

    pub fn from_client(client: Client, url: &str) -> Self {
        Self { client, base: api_base_url(url), token: None }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Absolute URL for an API path such as `users/tokens/provision`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}/", self.base, path.trim_matches('/'))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Send a request and decode the JSON body, if any.
    pub(crate) fn execute(&self, request: RequestBuilder) -> Result<Option<Value>, RecordError> {
        let request = match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Token {token}")),
            None => request,
        };
        let response = request.header(ACCEPT, "application/json").send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(RecordError::Api { status: status.as_u16(), body: truncate_body(&body) });
        }
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| RecordError::Decode(format!("invalid JSON from NetBox: {e}")))
    }
}

impl NetboxApi for HttpNetbox {
    fn find(&self, resource: Resource, lookup: &Lookup) -> Result<Option<ObjectId>, RecordError> {
        let url = self.url(resource.api_path());
        let mut query: Vec<(&str, &str)> =
            lookup.filters.iter().map(|(field, value)| (*field, value.as_str())).collect();
        query.push(("limit", "2"));
        tracing::debug!("GET {} {:?}", url, query);

        let body = self
            .execute(self.client.get(&url).query(&query))?
            .ok_or_else(|| RecordError::Decode("empty response to lookup".to_string()))?;
        let page: Page =
            serde_json::from_value(body).map_err(|e| RecordError::Decode(e.to_string()))?;

        match page.count {
            0 => Ok(None),
            1 => page
                .results
                .first()
                .map(|object| Some(object.id))
                .ok_or_else(|| RecordError::Decode("lookup count 1 without results".to_string())),
            count => Err(RecordError::Ambiguous {
                field: lookup.filters.first().map(|(field, _)| *field).unwrap_or("name"),
                value: lookup.key_value().to_string(),
                count,
            }),
        }
    }

    fn create(&self, resource: Resource, payload: &Value) -> Result<ObjectId, RecordError> {
        let url = self.url(resource.api_path());
        tracing::debug!("POST {}", url);

        let body = self.execute(self.client.post(&url).json(payload))?;
        body.as_ref()
            .and_then(|created| created.get("id"))
            .and_then(Value::as_u64)
            .ok_or_else(|| RecordError::Decode("created object has no id".to_string()))
    }

    fn update(&self, resource: Resource, id: ObjectId, payload: &Value) -> Result<(), RecordError> {
        let url = self.url(&format!("{}/{}", resource.api_path(), id));
        tracing::debug!("PATCH {}", url);

        self.execute(self.client.patch(&url).json(payload))?;
        Ok(())
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    truncated.push_str("...");
    truncated
}

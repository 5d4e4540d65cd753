//! Wire types for the catalog REST API and the client-side error taxonomy.
//!
//! Resource endpoints wrap their payloads in `{ "data": ... }`; auth
//! endpoints return bare JSON objects.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Message shown when a failure carries nothing more specific.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred. Please try again.";

// =============================================================================
// ERROR
// =============================================================================

/// Failures from calls to the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Bad or expired credentials (401, or a login reply without a token).
    #[error("authentication failed: {}", .0.join("; "))]
    Authentication(Vec<String>),

    /// The credential is valid but lacks the role the action needs (403).
    #[error("forbidden: {}", .0.join("; "))]
    Forbidden(Vec<String>),

    /// The request payload was rejected (422 or an `errors` map).
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Any other non-success status.
    #[error("server returned status {status}")]
    Server { status: u16, messages: Vec<String> },

    /// No response was received.
    #[error("network request failed: {0}")]
    Network(String),

    /// A success response body could not be decoded.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Convert the failure into the list of messages a form displays.
    #[must_use]
    pub fn display_messages(&self) -> Vec<String> {
        let messages = match self {
            Self::Authentication(m) | Self::Forbidden(m) | Self::Validation(m) | Self::Server { messages: m, .. } => {
                m.clone()
            }
            Self::Network(_) | Self::Decode(_) => Vec::new(),
        };
        if messages.is_empty() { vec![UNKNOWN_ERROR_MESSAGE.to_owned()] } else { messages }
    }

    /// Whether the server rejected the credential itself.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

/// Error body shape: `{ "message": "...", "errors": { "field": ["..."] } }`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    /// Field name to messages, in the order the server sent them.
    #[serde(default)]
    pub errors: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ErrorBody {
    /// Flatten `errors` values, else `message`, else nothing.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        if let Some(errors) = &self.errors {
            let flat: Vec<String> = errors.values().flat_map(field_messages).collect();
            if !flat.is_empty() {
                return flat;
            }
        }
        self.message.iter().cloned().collect()
    }
}

fn field_messages(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items.iter().filter_map(|m| m.as_str().map(str::to_owned)).collect(),
        serde_json::Value::String(m) => vec![m.clone()],
        _ => Vec::new(),
    }
}

/// Classify a non-success response from its status code and raw body.
#[must_use]
pub fn classify_failure(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let messages = parsed.messages();
    match status {
        401 => ApiError::Authentication(messages),
        403 => ApiError::Forbidden(messages),
        422 => ApiError::Validation(messages),
        _ if parsed.errors.as_ref().is_some_and(|e| !e.is_empty()) => ApiError::Validation(messages),
        _ => ApiError::Server { status, messages },
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Current user profile as returned by `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub is_admin: bool,
}

/// User ids are numeric on some deployments and uuid strings on others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// `POST /login` body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `POST /register` body.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Reply from `/login` and `/register`. A missing token with a message is
/// how the API reports bad credentials on login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TokenResponse {
    /// Extract the token or turn the reply into an authentication failure.
    pub fn into_token(self) -> Result<String, ApiError> {
        match self.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ApiError::Authentication(self.message.into_iter().collect())),
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Resource envelope used by all catalog endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    pub hex_code: String,
}

impl std::str::FromStr for Color {
    type Err = String;

    /// Parse `name=#hex`, e.g. `red=#ff0000`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, hex_code) = raw.split_once('=').ok_or_else(|| format!("expected NAME=#HEX, got '{raw}'"))?;
        let (name, hex_code) = (name.trim(), hex_code.trim());
        if name.is_empty() || hex_code.is_empty() {
            return Err(format!("expected NAME=#HEX, got '{raw}'"));
        }
        Ok(Self { name: name.to_owned(), hex_code: hex_code.to_owned() })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "number_or_string")]
    pub price: f64,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub colors: Vec<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Create/update payload for a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

/// Create/update payload for a product. Colors travel as `name -> hex_code`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Uuid,
    pub colors: BTreeMap<String, String>,
}

impl ProductInput {
    /// Collapse a color list into the map the API expects. Later entries
    /// with the same name win.
    #[must_use]
    pub fn colors_from(list: &[Color]) -> BTreeMap<String, String> {
        list.iter().map(|c| (c.name.clone(), c.hex_code.clone())).collect()
    }
}

/// Short display form of an id: first and last three characters.
#[must_use]
pub fn short_id(id: &Uuid) -> String {
    let s = id.to_string();
    format!("{}...{}", &s[..3], &s[s.len() - 3..])
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Null(Option<()>),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Int(n) => n == 1,
        Raw::Null(_) => false,
    })
}

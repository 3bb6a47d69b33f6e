//! Service Contract Types
//!
//! Payloads returned by the content service, plus the JSON envelope every
//! endpoint wraps them in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{ServiceError, ServiceResult};

/// Fallback message when the service reports failure without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "request failed without a message";

// ============================================================================
// Response Payloads
// ============================================================================

/// Text produced by `generate_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Identifier assigned by the service, if it persisted the draft.
    pub id: Option<String>,
    pub text: String,
}

/// Acknowledgement of `save_content`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub id: Option<String>,
    pub message: Option<String>,
}

/// Canonical record of a scheduled post as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledContent {
    pub id: String,
    #[serde(default)]
    pub publish_time: Option<NaiveDateTime>,
}

/// One entry of the recent engagement feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Interaction kind (`comment`, `message`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_type: Option<String>,
    pub message: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// An operator-entered interaction handed to `process_interaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRequest {
    /// Interaction kind (`comment`, `message`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Audience segment of the sender (`subscriber`, `new_follower`, ...).
    pub user_type: String,
    pub message: String,
}

impl InteractionRequest {
    pub fn new(kind: impl Into<String>, user_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            user_type: user_type.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// System Settings
// ============================================================================

/// Reply windows, in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseTimes {
    pub comments: u32,
    pub direct_messages: u32,
}

impl Default for ResponseTimes {
    fn default() -> Self {
        Self {
            comments: 5,
            direct_messages: 10,
        }
    }
}

/// Service-wide settings as exposed by `/api/settings`. Keys the console
/// does not know about are kept so a load, edit, save cycle never drops them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceSettings {
    pub openai_api_key: String,
    pub mongo_db_uri: String,
    pub post_generation_limit: u32,
    pub response_time: ResponseTimes,
    pub backup_frequency: String,
    pub enable_notifications: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            mongo_db_uri: String::new(),
            post_generation_limit: 10,
            response_time: ResponseTimes::default(),
            backup_frequency: "daily".to_string(),
            enable_notifications: true,
            extra: Map::new(),
        }
    }
}

impl fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSettings")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("mongo_db_uri", &redact(&self.mongo_db_uri))
            .field("post_generation_limit", &self.post_generation_limit)
            .field("response_time", &self.response_time)
            .field("backup_frequency", &self.backup_frequency)
            .field("enable_notifications", &self.enable_notifications)
            .finish_non_exhaustive()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Backend a connection test can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionTarget {
    OpenAi,
    MongoDb,
}

impl ConnectionTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::MongoDb => "mongodb",
        }
    }

    pub fn all() -> &'static [ConnectionTarget] {
        &[Self::OpenAi, Self::MongoDb]
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown connection target '{s}' (expected openai or mongodb)"))
    }
}

// ============================================================================
// Health
// ============================================================================

/// Result of a one-shot health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The service answered with `status: "healthy"`.
    Healthy,
    /// The service answered, but not with a healthy status.
    Unhealthy,
    /// No usable answer was received.
    Unreachable,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Unreachable => "unreachable",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// The `{success, message?, ...}` object every endpoint answers with.
///
/// Payload fields live alongside `success` at the top level, so they are
/// kept as a loose map and pulled out by name.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Envelope {
    /// Turn `success: false` into [`ServiceError::RemoteRejected`].
    pub fn into_success(self) -> ServiceResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ServiceError::rejected(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ))
        }
    }

    /// Remove and decode a required payload field.
    pub fn take<T: DeserializeOwned>(&mut self, field: &str) -> ServiceResult<T> {
        let value = self
            .body
            .remove(field)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ServiceError::decode(format!("missing field '{field}'")))?;
        serde_json::from_value(value)
            .map_err(|e| ServiceError::decode(format!("field '{field}': {e}")))
    }

    /// Remove and decode an optional payload field.
    pub fn take_opt<T: DeserializeOwned>(&mut self, field: &str) -> ServiceResult<Option<T>> {
        match self.body.remove(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ServiceError::decode(format!("field '{field}': {e}"))),
        }
    }
}

//! HTTP Content Service
//!
//! `reqwest`-backed implementation of [`ContentService`] against the
//! console's JSON API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, RequestBuilder};
use serde_json::json;

use super::errors::{ServiceError, ServiceResult};
use super::types::{
    ConnectionTarget, Envelope, GeneratedContent, HealthStatus, Interaction, InteractionRequest,
    SaveReceipt, ScheduledContent, ServiceSettings,
};
use super::ContentService;
use crate::config::ServiceConfig;
use crate::core::content::{ContentItem, GenerationRequest};
use crate::core::personality::PersonalityDocument;

const CONTENT_CREATE_PATH: &str = "/api/content/create";
const CONTENT_SCHEDULE_PATH: &str = "/api/content/schedule";
const CONTENT_SAVE_PATH: &str = "/api/content/save";
const PERSONALITY_CONFIG_PATH: &str = "/api/personality/config";
const PERSONALITY_UPDATE_PATH: &str = "/api/personality/update";
const PERSONALITY_GENERATE_PATH: &str = "/api/personality/generate";
const RECENT_INTERACTIONS_PATH: &str = "/api/engagement/recent";
const INTERACT_PATH: &str = "/api/engagement/interact";
const SETTINGS_PATH: &str = "/api/settings";
const TEST_CONNECTION_PATH: &str = "/api/test-connection";
const HEALTH_PATH: &str = "/health";

/// Longest slice of a non-JSON error body echoed back in a rejection message.
const MAX_ERROR_BODY: usize = 200;

/// Content service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpContentService {
    base_url: String,
    client: Client,
}

impl HttpContentService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and unwrap the success envelope.
    async fn send(&self, request: RequestBuilder, path: &str) -> ServiceResult<Envelope> {
        tracing::debug!(path, "calling content service");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "content service call failed");
            ServiceError::from(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        let result = match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) if status.is_success() => envelope.into_success(),
            Ok(envelope) => Err(ServiceError::rejected(
                envelope
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            )),
            Err(e) if status.is_success() => Err(ServiceError::decode(e.to_string())),
            Err(_) => {
                let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
                Err(ServiceError::rejected(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    snippet.trim()
                )))
            }
        };

        result.inspect_err(|e| tracing::warn!(path, error = %e, "content service rejected call"))
    }
}

fn content_body(content: &ContentItem) -> serde_json::Value {
    json!({
        "id": content.id,
        "text": content.text,
        "topic": content.topic,
        "tone": content.tone,
        "content_type": content.content_type,
    })
}

#[async_trait]
impl ContentService for HttpContentService {
    async fn generate_content(&self, request: &GenerationRequest) -> ServiceResult<GeneratedContent> {
        let body = json!({
            "topic": request.topic,
            "content_type": request.content_type,
            "tone": request.tone,
            "word_count": request.word_count,
            "include_hashtags": request.include_hashtags,
        });
        let mut envelope = self
            .send(
                self.client.post(self.url(CONTENT_CREATE_PATH)).json(&body),
                CONTENT_CREATE_PATH,
            )
            .await?;

        Ok(GeneratedContent {
            text: envelope.take("content")?,
            id: envelope.take_opt("id")?,
        })
    }

    async fn schedule_content(
        &self,
        content: &ContentItem,
        publish_time: NaiveDateTime,
    ) -> ServiceResult<ScheduledContent> {
        let body = json!({
            "content": content_body(content),
            "publish_time": publish_time,
        });
        let mut envelope = self
            .send(
                self.client.post(self.url(CONTENT_SCHEDULE_PATH)).json(&body),
                CONTENT_SCHEDULE_PATH,
            )
            .await?;

        envelope.take("scheduled_content")
    }

    async fn save_content(&self, content: &ContentItem) -> ServiceResult<SaveReceipt> {
        let body = json!({ "content": content_body(content) });
        let mut envelope = self
            .send(
                self.client.post(self.url(CONTENT_SAVE_PATH)).json(&body),
                CONTENT_SAVE_PATH,
            )
            .await?;

        Ok(SaveReceipt {
            id: envelope.take_opt("id")?,
            message: envelope.message.take(),
        })
    }

    async fn get_personality_config(&self) -> ServiceResult<PersonalityDocument> {
        let mut envelope = self
            .send(
                self.client.get(self.url(PERSONALITY_CONFIG_PATH)),
                PERSONALITY_CONFIG_PATH,
            )
            .await?;

        envelope.take("config")
    }

    async fn update_personality(&self, config: &PersonalityDocument) -> ServiceResult<String> {
        let body = json!({ "config": config });
        let envelope = self
            .send(
                self.client.post(self.url(PERSONALITY_UPDATE_PATH)).json(&body),
                PERSONALITY_UPDATE_PATH,
            )
            .await?;

        Ok(envelope
            .message
            .unwrap_or_else(|| "Personality updated".to_string()))
    }

    async fn generate_personality_response(&self, prompt: &str) -> ServiceResult<String> {
        let body = json!({ "prompt": prompt });
        let mut envelope = self
            .send(
                self.client.post(self.url(PERSONALITY_GENERATE_PATH)).json(&body),
                PERSONALITY_GENERATE_PATH,
            )
            .await?;

        envelope.take("response")
    }

    async fn list_recent_interactions(&self) -> ServiceResult<Vec<Interaction>> {
        let mut envelope = self
            .send(
                self.client.get(self.url(RECENT_INTERACTIONS_PATH)),
                RECENT_INTERACTIONS_PATH,
            )
            .await?;

        Ok(envelope.take_opt("interactions")?.unwrap_or_default())
    }

    async fn process_interaction(&self, interaction: &InteractionRequest) -> ServiceResult<String> {
        let mut envelope = self
            .send(
                self.client.post(self.url(INTERACT_PATH)).json(interaction),
                INTERACT_PATH,
            )
            .await?;

        envelope.take("response")
    }

    async fn get_settings(&self) -> ServiceResult<ServiceSettings> {
        let mut envelope = self
            .send(self.client.get(self.url(SETTINGS_PATH)), SETTINGS_PATH)
            .await?;

        envelope.take("settings")
    }

    async fn update_settings(&self, settings: &ServiceSettings) -> ServiceResult<String> {
        let envelope = self
            .send(
                self.client.post(self.url(SETTINGS_PATH)).json(settings),
                SETTINGS_PATH,
            )
            .await?;

        Ok(envelope
            .message
            .unwrap_or_else(|| "Settings saved".to_string()))
    }

    async fn test_connection(&self, target: ConnectionTarget) -> ServiceResult<String> {
        let body = json!({ "service": target });
        let envelope = self
            .send(
                self.client.post(self.url(TEST_CONNECTION_PATH)).json(&body),
                TEST_CONNECTION_PATH,
            )
            .await?;

        Ok(envelope
            .message
            .unwrap_or_else(|| format!("Connection to {target} successful")))
    }

    async fn check_health(&self) -> HealthStatus {
        let response = match self.client.get(self.url(HEALTH_PATH)).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "health check failed");
                return HealthStatus::Unreachable;
            }
        };

        match response.json::<serde_json::Value>().await {
            Ok(body) if body.get("status").and_then(|s| s.as_str()) == Some("healthy") => {
                HealthStatus::Healthy
            }
            Ok(_) => HealthStatus::Unhealthy,
            Err(e) => {
                tracing::warn!(error = %e, "health check returned an unreadable body");
                HealthStatus::Unhealthy
            }
        }
    }
}

//! Mock implementations for testing
//!
//! `mockall` covers expectation-style tests (see `MockContentService`, generated
//! on the trait itself). The fake here is for tests that need to hold a call
//! open or make it slow.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Notify;

use crate::core::content::{ContentItem, GenerationRequest};
use crate::core::personality::PersonalityDocument;
use crate::core::service::{
    ConnectionTarget, ContentService, GeneratedContent, HealthStatus, Interaction,
    InteractionRequest, SaveReceipt, ScheduledContent, ServiceResult, ServiceSettings,
};

// ============================================================================
// Fake Content Service
// ============================================================================

/// In-memory content service.
///
/// When gated, `save_content` and `schedule_content` block until
/// [`FakeContentService::release`] is called. `delay` is applied to the same
/// two calls.
#[derive(Debug, Default)]
pub struct FakeContentService {
    gated: bool,
    gate: Notify,
    delay: Duration,
    pub generate_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
    pub schedule_calls: AtomicUsize,
}

impl FakeContentService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gated: true,
            ..Self::default()
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::default()
        })
    }

    /// Let one held call through.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    async fn hold(&self) {
        if self.gated {
            self.gate.notified().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl ContentService for FakeContentService {
    async fn generate_content(&self, request: &GenerationRequest) -> ServiceResult<GeneratedContent> {
        let n = self.generate_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GeneratedContent {
            id: Some(format!("gen-{n}")),
            text: format!("A {} about {}.", request.content_type, request.topic),
        })
    }

    async fn schedule_content(
        &self,
        _content: &ContentItem,
        publish_time: NaiveDateTime,
    ) -> ServiceResult<ScheduledContent> {
        let n = self.schedule_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.hold().await;
        Ok(ScheduledContent {
            id: format!("sched-{n}"),
            publish_time: Some(publish_time),
        })
    }

    async fn save_content(&self, _content: &ContentItem) -> ServiceResult<SaveReceipt> {
        let n = self.save_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.hold().await;
        Ok(SaveReceipt {
            id: Some(format!("saved-{n}")),
            message: Some("Content saved".to_string()),
        })
    }

    async fn get_personality_config(&self) -> ServiceResult<PersonalityDocument> {
        Ok(PersonalityDocument::default())
    }

    async fn update_personality(&self, _config: &PersonalityDocument) -> ServiceResult<String> {
        Ok("Personality updated".to_string())
    }

    async fn generate_personality_response(&self, prompt: &str) -> ServiceResult<String> {
        Ok(format!("You asked: {prompt}"))
    }

    async fn list_recent_interactions(&self) -> ServiceResult<Vec<Interaction>> {
        Ok(Vec::new())
    }

    async fn process_interaction(&self, interaction: &InteractionRequest) -> ServiceResult<String> {
        Ok(format!("Thanks for the {}!", interaction.kind))
    }

    async fn get_settings(&self) -> ServiceResult<ServiceSettings> {
        Ok(ServiceSettings::default())
    }

    async fn update_settings(&self, _settings: &ServiceSettings) -> ServiceResult<String> {
        Ok("Settings saved".to_string())
    }

    async fn test_connection(&self, target: ConnectionTarget) -> ServiceResult<String> {
        Ok(format!("Connection to {target} successful"))
    }

    async fn check_health(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

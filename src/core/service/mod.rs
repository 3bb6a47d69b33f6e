//! Content Service Contract
//!
//! The remote content/personality service is an opaque collaborator. This
//! module defines what the console needs from it:
//!
//! - [`ContentService`]: async trait with one method per remote call
//! - [`HttpContentService`]: `reqwest` implementation against the JSON API
//! - [`ServiceError`]: rejected vs. unreachable vs. timed out
//!
//! Every endpoint answers with an envelope carrying a `success` flag; a
//! `false` flag becomes [`ServiceError::RemoteRejected`], no response at all
//! becomes [`ServiceError::RemoteUnreachable`].

mod errors;
mod http;
mod types;

pub use errors::{ServiceError, ServiceResult};
pub use http::HttpContentService;
pub use types::{
    ConnectionTarget, Envelope, GeneratedContent, HealthStatus, Interaction, InteractionRequest,
    ResponseTimes, SaveReceipt, ScheduledContent, ServiceSettings, DEFAULT_FAILURE_MESSAGE,
};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::core::content::{ContentItem, GenerationRequest};
use crate::core::personality::PersonalityDocument;

/// Operations the console consumes from the remote service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Generate a new piece of content.
    async fn generate_content(&self, request: &GenerationRequest) -> ServiceResult<GeneratedContent>;

    /// Hand a previewed item to the service for publication at `publish_time`.
    async fn schedule_content(
        &self,
        content: &ContentItem,
        publish_time: NaiveDateTime,
    ) -> ServiceResult<ScheduledContent>;

    /// Persist a previewed item without scheduling it.
    async fn save_content(&self, content: &ContentItem) -> ServiceResult<SaveReceipt>;

    /// Fetch the personality document currently active on the service.
    async fn get_personality_config(&self) -> ServiceResult<PersonalityDocument>;

    /// Replace the active personality document. Returns the service's message.
    async fn update_personality(&self, config: &PersonalityDocument) -> ServiceResult<String>;

    /// Ask the personality to answer a free-form prompt.
    async fn generate_personality_response(&self, prompt: &str) -> ServiceResult<String>;

    /// Most recent engagement interactions, newest first as the service orders them.
    async fn list_recent_interactions(&self) -> ServiceResult<Vec<Interaction>>;

    /// Have the persona answer an incoming interaction. Returns the reply.
    async fn process_interaction(&self, interaction: &InteractionRequest) -> ServiceResult<String>;

    async fn get_settings(&self) -> ServiceResult<ServiceSettings>;

    /// Replace the service settings. Returns the service's message.
    async fn update_settings(&self, settings: &ServiceSettings) -> ServiceResult<String>;

    /// Ask the service to check its connection to a backend.
    async fn test_connection(&self, target: ConnectionTarget) -> ServiceResult<String>;

    /// One-shot health probe. Never fails; unreachable is a status.
    async fn check_health(&self) -> HealthStatus;
}

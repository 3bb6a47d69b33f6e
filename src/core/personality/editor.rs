//! Personality Editor
//!
//! Stateful front for the pure engine. Holds the current sliders and the
//! accumulated interest edits, and re-derives the config after every change
//! so there is a single source of truth for the derived fields.

use super::document::PersonalityDocument;
use super::engine::{resolve_config, PersonalityConfig};
use super::errors::Result;
use super::interests::InterestSet;
use super::sliders::{set_slider, SliderSet};
use crate::core::service::ContentService;

#[derive(Debug, Clone)]
pub struct PersonalityEditor {
    sliders: SliderSet,
    config: PersonalityConfig,
    /// Last document loaded from (or published to) the service; unmanaged
    /// fields are written back from here.
    document: PersonalityDocument,
}

impl PersonalityEditor {
    pub fn new(sliders: SliderSet, interests: InterestSet) -> Self {
        let config = resolve_config(&sliders, &interests);
        Self {
            sliders,
            config,
            document: PersonalityDocument::default(),
        }
    }

    /// Build an editor from a service document. `defaults` fills sliders the
    /// document says nothing about.
    pub fn from_document(document: PersonalityDocument, defaults: &SliderSet) -> Result<Self> {
        let (sliders, interests) = document.to_state(defaults)?;
        let config = resolve_config(&sliders, &interests);
        Ok(Self {
            sliders,
            config,
            document,
        })
    }

    pub fn sliders(&self) -> &SliderSet {
        &self.sliders
    }

    pub fn config(&self) -> &PersonalityConfig {
        &self.config
    }

    pub fn interests(&self) -> &InterestSet {
        &self.config.interests
    }

    /// Move one slider (clamped) and re-derive.
    pub fn set_slider(&mut self, name: &str, value: i64) -> Result<&PersonalityConfig> {
        self.sliders = set_slider(&self.sliders, name, value)?;
        // Interests carry forward, including any tag the rule added earlier.
        self.config = resolve_config(&self.sliders, &self.config.interests);
        Ok(&self.config)
    }

    /// Toggle one interest tag and re-derive.
    pub fn toggle_interest(&mut self, tag: &str) -> &PersonalityConfig {
        let interests = self.config.interests.toggled(tag);
        self.config = resolve_config(&self.sliders, &interests);
        &self.config
    }

    /// The stored document with the current config written into it.
    pub fn to_document(&self) -> PersonalityDocument {
        self.document.with_config(&self.config, &self.sliders)
    }

    /// Fetch the active personality from the service.
    pub async fn load(service: &dyn ContentService, defaults: &SliderSet) -> Result<Self> {
        let document = service.get_personality_config().await?;
        tracing::info!(
            interests = document.base_traits.interests.len(),
            has_sliders = document.sliders.is_some(),
            "loaded personality document"
        );
        Self::from_document(document, defaults)
    }

    /// Push the current config to the service. Returns the service message.
    pub async fn publish(&mut self, service: &dyn ContentService) -> Result<String> {
        let document = self.to_document();
        let message = service.update_personality(&document).await?;
        tracing::info!(
            tone = %self.config.tone,
            formality = %self.config.formality,
            humor_level = %self.config.humor_level,
            "published personality"
        );
        self.document = document;
        Ok(message)
    }
}

impl Default for PersonalityEditor {
    fn default() -> Self {
        Self::new(SliderSet::default(), InterestSet::new())
    }
}

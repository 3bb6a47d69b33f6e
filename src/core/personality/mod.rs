//! Personality Module
//!
//! Maps five numeric dials and a list of interest tags to the structured
//! personality configuration the content service consumes.
//!
//! ## Architecture
//!
//! ### Engine (pure)
//! - `sliders`: the five dials, clamped to `[0, 100]`
//! - `traits`: threshold tables for formality, humor level and tone
//! - `interests`: ordered, deduplicated interest tags
//! - `engine`: `derive_config` and the traditional-values rule
//!
//! ### Sync Layer
//! - `document`: the service's document shape, with unmanaged fields preserved
//! - `editor`: stateful editor that loads from and publishes to the service
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::core::personality::{resolve_config, InterestSet, SliderSet};
//!
//! let sliders = SliderSet::new(20, 60, 70, 50, 80);
//! let interests: InterestSet = ["family", "lifestyle"].into_iter().collect();
//! let config = resolve_config(&sliders, &interests);
//! assert!(config.interests.contains("traditional values"));
//! ```

pub mod document;
pub mod editor;
pub mod engine;
pub mod errors;
pub mod interests;
pub mod sliders;
pub mod traits;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use document::{BaseTraits, ConversationStyle, PersonalityDocument};
pub use editor::PersonalityEditor;
pub use engine::{
    apply_traditionalism_rule, derive_config, representative_sliders, resolve_config,
    PersonalityConfig, TRADITIONALISM_THRESHOLD, TRADITIONAL_VALUES_TAG,
};
pub use errors::{PersonalityError, Result};
pub use interests::{toggle_interest, InterestSet};
pub use sliders::{set_slider, SliderName, SliderSet, SLIDER_DEFAULT, SLIDER_MAX, SLIDER_MIN};
pub use traits::{DerivedTrait, Formality, HumorLevel, Tone};

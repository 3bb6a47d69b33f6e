//! Personality Config Engine
//!
//! Pure mapping from the dial representation ([`SliderSet`] + interest tags)
//! to the discrete [`PersonalityConfig`] document. Nothing here performs I/O
//! or mutates its arguments.

use serde::{Deserialize, Serialize};

use super::interests::InterestSet;
use super::sliders::SliderSet;
use super::traits::{DerivedTrait, Formality, HumorLevel, Tone};

/// Tag guaranteed present once traditionalism reaches the threshold.
pub const TRADITIONAL_VALUES_TAG: &str = "traditional values";
/// Traditionalism value at which [`TRADITIONAL_VALUES_TAG`] is auto-added.
pub const TRADITIONALISM_THRESHOLD: u8 = 75;

/// Structured personality configuration derived from sliders and interests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityConfig {
    pub tone: Tone,
    pub formality: Formality,
    pub humor_level: HumorLevel,
    pub interests: InterestSet,
    /// `traditionalism >= TRADITIONALISM_THRESHOLD`.
    pub traditionalism_marker: bool,
}

/// Apply the threshold tables to `sliders`. Interests pass through as given.
pub fn derive_config(sliders: &SliderSet, interests: &InterestSet) -> PersonalityConfig {
    PersonalityConfig {
        tone: Tone::from_slider(sliders.assertiveness()),
        formality: Formality::from_slider(sliders.formality()),
        humor_level: HumorLevel::from_slider(sliders.humor()),
        interests: interests.clone(),
        traditionalism_marker: sliders.traditionalism() >= TRADITIONALISM_THRESHOLD,
    }
}

/// Ensure [`TRADITIONAL_VALUES_TAG`] is present when traditionalism is at or
/// above the threshold. Otherwise the config is returned unchanged.
///
/// The tag is never removed here, even after traditionalism drops below the
/// threshold. Known quirk carried over from the console's behavior: an
/// auto-added tag sticks until the operator toggles it off.
pub fn apply_traditionalism_rule(config: &PersonalityConfig, sliders: &SliderSet) -> PersonalityConfig {
    if sliders.traditionalism() >= TRADITIONALISM_THRESHOLD
        && !config.interests.contains(TRADITIONAL_VALUES_TAG)
    {
        tracing::debug!(
            traditionalism = sliders.traditionalism(),
            "adding '{TRADITIONAL_VALUES_TAG}' interest"
        );
        PersonalityConfig {
            interests: config.interests.with_tag(TRADITIONAL_VALUES_TAG),
            ..config.clone()
        }
    } else {
        config.clone()
    }
}

/// [`derive_config`] followed by [`apply_traditionalism_rule`].
pub fn resolve_config(sliders: &SliderSet, interests: &InterestSet) -> PersonalityConfig {
    apply_traditionalism_rule(&derive_config(sliders, interests), sliders)
}

/// Sliders that derive back to `config`'s categorical traits.
///
/// Each derived slider is set to the midpoint of its trait's band; warmth
/// and traditionalism have no categorical counterpart and come from `base`.
pub fn representative_sliders(config: &PersonalityConfig, base: &SliderSet) -> SliderSet {
    SliderSet::new(
        i64::from(config.formality.representative()),
        i64::from(config.humor_level.representative()),
        i64::from(config.tone.representative()),
        i64::from(base.warmth()),
        i64::from(base.traditionalism()),
    )
}

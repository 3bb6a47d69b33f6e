//! Personality Document
//!
//! The personality configuration as the remote service stores it:
//!
//! ```json
//! {
//!   "base_traits": { "age": "early 30s", "interests": ["family", "lifestyle"] },
//!   "conversation_style": { "formality": "casual", "humor_level": "mild", "tone": "balanced" },
//!   "sliders": { "formality": 20, "humor": 40, "assertiveness": 45, "warmth": 70, "traditionalism": 80 }
//! }
//! ```
//!
//! Fields the console does not manage are kept verbatim so that a
//! load, edit, publish cycle never drops them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::engine::{representative_sliders, resolve_config, PersonalityConfig};
use super::errors::{PersonalityError, Result};
use super::interests::InterestSet;
use super::sliders::{SliderName, SliderSet};
use super::traits::{DerivedTrait, Formality, HumorLevel, Tone};

/// Service-side personality document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalityDocument {
    #[serde(default)]
    pub base_traits: BaseTraits,
    #[serde(default)]
    pub conversation_style: ConversationStyle,
    /// Slider positions last published by a console, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sliders: Option<SliderSet>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseTraits {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Categorical fields are kept as raw strings so an unexpected value from
/// the service does not break loading the rest of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humor_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersonalityDocument {
    /// Fresh document holding only what the console manages.
    pub fn from_config(config: &PersonalityConfig, sliders: &SliderSet) -> Self {
        Self::default().with_config(config, sliders)
    }

    /// Copy of this document with the managed fields replaced by `config`
    /// and `sliders`. Unmanaged fields are carried over.
    pub fn with_config(&self, config: &PersonalityConfig, sliders: &SliderSet) -> Self {
        let mut doc = self.clone();
        doc.base_traits.interests = config.interests.to_vec();
        doc.conversation_style.formality = Some(config.formality.as_str().to_string());
        doc.conversation_style.humor_level = Some(config.humor_level.as_str().to_string());
        doc.conversation_style.tone = Some(config.tone.as_str().to_string());
        doc.sliders = Some(*sliders);
        doc
    }

    pub fn interests(&self) -> InterestSet {
        self.base_traits.interests.iter().cloned().collect()
    }

    /// Recover slider positions and interests from the document.
    ///
    /// Stored sliders are the starting point, but a categorical field that
    /// disagrees with its stored slider wins: that slider moves to the
    /// midpoint of the stated band. Without stored sliders, each categorical
    /// field present is mapped to its band midpoint and the rest come from
    /// `base`. An unrecognized categorical value is `InvalidInput`.
    pub fn to_state(&self, base: &SliderSet) -> Result<(SliderSet, InterestSet)> {
        let interests = self.interests();
        let style = &self.conversation_style;
        let formality = parse_style::<Formality>(style.formality.as_deref())?;
        let humor_level = parse_style::<HumorLevel>(style.humor_level.as_deref())?;
        let tone = parse_style::<Tone>(style.tone.as_deref())?;

        if let Some(stored) = self.sliders {
            let sliders = align(stored, SliderName::Formality, formality);
            let sliders = align(sliders, SliderName::Humor, humor_level);
            let sliders = align(sliders, SliderName::Assertiveness, tone);
            return Ok((sliders, interests));
        }

        let base_config = resolve_config(base, &interests);
        let config = PersonalityConfig {
            formality: formality.unwrap_or(base_config.formality),
            humor_level: humor_level.unwrap_or(base_config.humor_level),
            tone: tone.unwrap_or(base_config.tone),
            ..base_config
        };

        Ok((representative_sliders(&config, base), interests))
    }
}

fn parse_style<T>(value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = PersonalityError>,
{
    value.map(str::parse::<T>).transpose()
}

/// Move `name` into the band of `stated` when the stored position derives to
/// something else.
fn align<T: DerivedTrait + PartialEq>(sliders: SliderSet, name: SliderName, stated: Option<T>) -> SliderSet {
    let Some(stated) = stated else {
        return sliders;
    };
    let stored = T::from_slider(sliders.get(name));
    if stored == stated {
        return sliders;
    }

    tracing::warn!(
        slider = name.as_str(),
        stored = stored.as_str(),
        stated = stated.as_str(),
        "stored slider disagrees with conversation style, following the style"
    );
    sliders.with(name, i64::from(stated.representative()))
}

//! Derived Personality Traits
//!
//! Categorical fields computed from a single slider through a fixed threshold
//! table. Each table partitions `[0, 100]` into contiguous bands; a value
//! equal to a band's upper bound belongs to that band.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{PersonalityError, Result};
use super::sliders::SLIDER_MAX;

/// Upper bound of the `casual` formality band.
pub const FORMALITY_CASUAL_MAX: u8 = 30;
/// Upper bound of the `semi-formal` formality band.
pub const FORMALITY_SEMI_FORMAL_MAX: u8 = 70;

/// Upper bound of the `none` humor band.
pub const HUMOR_NONE_MAX: u8 = 20;
/// Upper bound of the `mild` humor band.
pub const HUMOR_MILD_MAX: u8 = 50;
/// Upper bound of the `moderate` humor band.
pub const HUMOR_MODERATE_MAX: u8 = 80;

/// Upper bound of the `gentle` tone band.
pub const TONE_GENTLE_MAX: u8 = 30;
/// Upper bound of the `balanced` tone band.
pub const TONE_BALANCED_MAX: u8 = 60;
/// Upper bound of the `confident` tone band.
pub const TONE_CONFIDENT_MAX: u8 = 85;

/// A categorical trait derived from one slider.
pub trait DerivedTrait: Sized + Copy {
    /// Pick the band containing `value`.
    fn from_slider(value: u8) -> Self;

    /// The slider values that map to this trait.
    fn band(&self) -> RangeInclusive<u8>;

    /// Wire name of the trait value.
    fn as_str(&self) -> &'static str;

    /// A slider value that derives back to this trait (the band midpoint).
    fn representative(&self) -> u8 {
        let band = self.band();
        // Both bounds are <= 100, so the sum fits in u16.
        ((u16::from(*band.start()) + u16::from(*band.end())) / 2) as u8
    }
}

// ============================================================================
// Formality
// ============================================================================

/// Register of the personality's writing, from the `formality` slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formality {
    Casual,
    SemiFormal,
    Formal,
}

impl DerivedTrait for Formality {
    fn from_slider(value: u8) -> Self {
        if value <= FORMALITY_CASUAL_MAX {
            Self::Casual
        } else if value <= FORMALITY_SEMI_FORMAL_MAX {
            Self::SemiFormal
        } else {
            Self::Formal
        }
    }

    fn band(&self) -> RangeInclusive<u8> {
        match self {
            Self::Casual => 0..=FORMALITY_CASUAL_MAX,
            Self::SemiFormal => FORMALITY_CASUAL_MAX + 1..=FORMALITY_SEMI_FORMAL_MAX,
            Self::Formal => FORMALITY_SEMI_FORMAL_MAX + 1..=SLIDER_MAX,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::SemiFormal => "semi-formal",
            Self::Formal => "formal",
        }
    }
}

impl FromStr for Formality {
    type Err = PersonalityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casual" => Ok(Self::Casual),
            "semi-formal" | "semi_formal" | "semiformal" => Ok(Self::SemiFormal),
            "formal" => Ok(Self::Formal),
            other => Err(PersonalityError::invalid_input(format!(
                "unknown formality '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Humor Level
// ============================================================================

/// How much humor the personality uses, from the `humor` slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumorLevel {
    None,
    Mild,
    // Older documents wrote "medium".
    #[serde(alias = "medium")]
    Moderate,
    High,
}

impl DerivedTrait for HumorLevel {
    fn from_slider(value: u8) -> Self {
        if value <= HUMOR_NONE_MAX {
            Self::None
        } else if value <= HUMOR_MILD_MAX {
            Self::Mild
        } else if value <= HUMOR_MODERATE_MAX {
            Self::Moderate
        } else {
            Self::High
        }
    }

    fn band(&self) -> RangeInclusive<u8> {
        match self {
            Self::None => 0..=HUMOR_NONE_MAX,
            Self::Mild => HUMOR_NONE_MAX + 1..=HUMOR_MILD_MAX,
            Self::Moderate => HUMOR_MILD_MAX + 1..=HUMOR_MODERATE_MAX,
            Self::High => HUMOR_MODERATE_MAX + 1..=SLIDER_MAX,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl FromStr for HumorLevel {
    type Err = PersonalityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "mild" => Ok(Self::Mild),
            "moderate" | "medium" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            other => Err(PersonalityError::invalid_input(format!(
                "unknown humor level '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Tone
// ============================================================================

/// Overall delivery of the personality, from the `assertiveness` slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Gentle,
    Balanced,
    Confident,
    Assertive,
}

impl DerivedTrait for Tone {
    fn from_slider(value: u8) -> Self {
        if value <= TONE_GENTLE_MAX {
            Self::Gentle
        } else if value <= TONE_BALANCED_MAX {
            Self::Balanced
        } else if value <= TONE_CONFIDENT_MAX {
            Self::Confident
        } else {
            Self::Assertive
        }
    }

    fn band(&self) -> RangeInclusive<u8> {
        match self {
            Self::Gentle => 0..=TONE_GENTLE_MAX,
            Self::Balanced => TONE_GENTLE_MAX + 1..=TONE_BALANCED_MAX,
            Self::Confident => TONE_BALANCED_MAX + 1..=TONE_CONFIDENT_MAX,
            Self::Assertive => TONE_CONFIDENT_MAX + 1..=SLIDER_MAX,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Gentle => "gentle",
            Self::Balanced => "balanced",
            Self::Confident => "confident",
            Self::Assertive => "assertive",
        }
    }
}

impl FromStr for Tone {
    type Err = PersonalityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gentle" => Ok(Self::Gentle),
            "balanced" => Ok(Self::Balanced),
            "confident" => Ok(Self::Confident),
            "assertive" => Ok(Self::Assertive),
            other => Err(PersonalityError::invalid_input(format!("unknown tone '{other}'"))),
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(DerivedTrait::as_str(self))
            }
        })*
    };
}

display_via_as_str!(Formality, HumorLevel, Tone);

//! Personality Sliders
//!
//! Five independent 0-100 dials. Values are clamped on every way in
//! (construction, [`set_slider`], deserialization) so a [`SliderSet`] can
//! never hold an out-of-range value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{PersonalityError, Result};

/// Lowest slider value.
pub const SLIDER_MIN: u8 = 0;
/// Highest slider value.
pub const SLIDER_MAX: u8 = 100;
/// Value every slider starts at.
pub const SLIDER_DEFAULT: u8 = 50;

/// Clamp an arbitrary integer into the slider range.
pub fn clamp_value(value: i64) -> u8 {
    // Bounds fit in u8 after the clamp.
    value.clamp(i64::from(SLIDER_MIN), i64::from(SLIDER_MAX)) as u8
}

// ============================================================================
// Slider Name
// ============================================================================

/// The fixed set of slider keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderName {
    Formality,
    Humor,
    Assertiveness,
    Warmth,
    Traditionalism,
}

impl SliderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formality => "formality",
            Self::Humor => "humor",
            Self::Assertiveness => "assertiveness",
            Self::Warmth => "warmth",
            Self::Traditionalism => "traditionalism",
        }
    }

    /// All slider names in canonical order.
    pub fn all() -> &'static [SliderName] {
        &[
            Self::Formality,
            Self::Humor,
            Self::Assertiveness,
            Self::Warmth,
            Self::Traditionalism,
        ]
    }
}

impl fmt::Display for SliderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SliderName {
    type Err = PersonalityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formality" => Ok(Self::Formality),
            "humor" => Ok(Self::Humor),
            "assertiveness" => Ok(Self::Assertiveness),
            "warmth" => Ok(Self::Warmth),
            "traditionalism" => Ok(Self::Traditionalism),
            _ => Err(PersonalityError::unknown_slider(s)),
        }
    }
}

// ============================================================================
// Slider Set
// ============================================================================

/// A full set of slider values, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>")]
pub struct SliderSet {
    formality: u8,
    humor: u8,
    assertiveness: u8,
    warmth: u8,
    traditionalism: u8,
}

impl SliderSet {
    /// Build a set from raw values, clamping each one.
    pub fn new(formality: i64, humor: i64, assertiveness: i64, warmth: i64, traditionalism: i64) -> Self {
        Self {
            formality: clamp_value(formality),
            humor: clamp_value(humor),
            assertiveness: clamp_value(assertiveness),
            warmth: clamp_value(warmth),
            traditionalism: clamp_value(traditionalism),
        }
    }

    /// Build a set from a name → value map.
    ///
    /// This is the input boundary: every key must be a known slider and all
    /// five must be present, otherwise `InvalidInput`. Values are clamped.
    pub fn from_map(map: &BTreeMap<String, i64>) -> Result<Self> {
        let mut set = Self::default();
        let mut seen = Vec::with_capacity(SliderName::all().len());

        for (key, value) in map {
            let name: SliderName = key
                .parse()
                .map_err(|_| PersonalityError::invalid_input(format!("unknown slider key '{key}'")))?;
            if seen.contains(&name) {
                return Err(PersonalityError::invalid_input(format!(
                    "slider '{name}' given more than once"
                )));
            }
            seen.push(name);
            set = set.with(name, *value);
        }

        if let Some(missing) = SliderName::all().iter().find(|n| !seen.contains(n)) {
            return Err(PersonalityError::invalid_input(format!(
                "missing slider '{missing}'"
            )));
        }

        Ok(set)
    }

    pub fn get(&self, name: SliderName) -> u8 {
        match name {
            SliderName::Formality => self.formality,
            SliderName::Humor => self.humor,
            SliderName::Assertiveness => self.assertiveness,
            SliderName::Warmth => self.warmth,
            SliderName::Traditionalism => self.traditionalism,
        }
    }

    /// Copy of this set with one slider changed (clamped).
    pub fn with(mut self, name: SliderName, value: i64) -> Self {
        let value = clamp_value(value);
        match name {
            SliderName::Formality => self.formality = value,
            SliderName::Humor => self.humor = value,
            SliderName::Assertiveness => self.assertiveness = value,
            SliderName::Warmth => self.warmth = value,
            SliderName::Traditionalism => self.traditionalism = value,
        }
        self
    }

    pub fn formality(&self) -> u8 {
        self.formality
    }

    pub fn humor(&self) -> u8 {
        self.humor
    }

    pub fn assertiveness(&self) -> u8 {
        self.assertiveness
    }

    pub fn warmth(&self) -> u8 {
        self.warmth
    }

    pub fn traditionalism(&self) -> u8 {
        self.traditionalism
    }

    /// `(name, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SliderName, u8)> + '_ {
        SliderName::all().iter().map(move |&name| (name, self.get(name)))
    }
}

impl Default for SliderSet {
    fn default() -> Self {
        let v = i64::from(SLIDER_DEFAULT);
        Self::new(v, v, v, v, v)
    }
}

impl TryFrom<BTreeMap<String, i64>> for SliderSet {
    type Error = PersonalityError;

    fn try_from(map: BTreeMap<String, i64>) -> Result<Self> {
        Self::from_map(&map)
    }
}

/// Return a new set with only `name` updated, clamping `value` to `[0, 100]`.
///
/// Fails with `UnknownSlider` when `name` is not one of the five keys.
pub fn set_slider(sliders: &SliderSet, name: &str, value: i64) -> Result<SliderSet> {
    let name: SliderName = name.parse()?;
    Ok(sliders.with(name, value))
}

//! Property-based tests for the Personality Config Engine
//!
//! Tests invariants:
//! - Same sliders and interests always derive the same config
//! - Out-of-range values are clamped, never stored
//! - Toggling a tag twice restores the original membership
//! - Applying the traditionalism rule twice equals applying it once

use proptest::prelude::*;

use crate::core::personality::{
    apply_traditionalism_rule, derive_config, representative_sliders, resolve_config, set_slider,
    toggle_interest, DerivedTrait, Formality, HumorLevel, InterestSet, SliderName, SliderSet, Tone,
    TRADITIONALISM_THRESHOLD, TRADITIONAL_VALUES_TAG,
};

// ============================================================================
// Strategies
// ============================================================================

fn arb_sliders() -> impl Strategy<Value = SliderSet> {
    (0i64..=100, 0i64..=100, 0i64..=100, 0i64..=100, 0i64..=100)
        .prop_map(|(f, h, a, w, t)| SliderSet::new(f, h, a, w, t))
}

fn arb_slider_name() -> impl Strategy<Value = SliderName> {
    prop::sample::select(SliderName::all().to_vec())
}

fn arb_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("family".to_string()),
        Just("lifestyle".to_string()),
        Just(TRADITIONAL_VALUES_TAG.to_string()),
        "[a-z]{1,12}( [a-z]{1,8})?",
    ]
}

fn arb_interests() -> impl Strategy<Value = InterestSet> {
    prop::collection::vec(arb_tag(), 0..8).prop_map(|tags| tags.into_iter().collect())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_derive_is_deterministic(sliders in arb_sliders(), interests in arb_interests()) {
        let a = derive_config(&sliders, &interests);
        let b = derive_config(&sliders, &interests);
        prop_assert_eq!(a.interests.to_vec(), b.interests.to_vec());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_set_slider_clamps(
        sliders in arb_sliders(),
        name in arb_slider_name(),
        value in any::<i64>(),
    ) {
        let updated = set_slider(&sliders, name.as_str(), value).unwrap();
        let stored = updated.get(name);
        prop_assert!(stored <= 100);
        prop_assert_eq!(i64::from(stored), value.clamp(0, 100));
    }

    #[test]
    fn prop_set_slider_touches_only_named(
        sliders in arb_sliders(),
        name in arb_slider_name(),
        value in -50i64..150,
    ) {
        let updated = set_slider(&sliders, name.as_str(), value).unwrap();
        for (other, v) in sliders.iter() {
            if other != name {
                prop_assert_eq!(updated.get(other), v);
            }
        }
    }

    #[test]
    fn prop_toggle_is_its_own_inverse(interests in arb_interests(), tag in arb_tag()) {
        let back = toggle_interest(&toggle_interest(&interests, &tag), &tag);
        prop_assert_eq!(&back, &interests);
        // Tags other than the toggled one keep their relative order.
        let others = |s: &InterestSet| s.iter().filter(|t| *t != tag).map(str::to_string).collect::<Vec<_>>();
        prop_assert_eq!(others(&back), others(&interests));
    }

    #[test]
    fn prop_traditionalism_rule_idempotent(sliders in arb_sliders(), interests in arb_interests()) {
        let once = apply_traditionalism_rule(&derive_config(&sliders, &interests), &sliders);
        let twice = apply_traditionalism_rule(&once, &sliders);
        prop_assert_eq!(twice.interests.to_vec(), once.interests.to_vec());
        prop_assert!(once.interests.iter().filter(|t| *t == TRADITIONAL_VALUES_TAG).count() <= 1);
    }

    #[test]
    fn prop_marker_implies_tag(sliders in arb_sliders(), interests in arb_interests()) {
        let config = resolve_config(&sliders, &interests);
        prop_assert_eq!(config.traditionalism_marker, sliders.traditionalism() >= TRADITIONALISM_THRESHOLD);
        if config.traditionalism_marker {
            prop_assert!(config.interests.contains(TRADITIONAL_VALUES_TAG));
        }
    }

    #[test]
    fn prop_rule_never_removes_tags(sliders in arb_sliders(), interests in arb_interests()) {
        let config = resolve_config(&sliders, &interests);
        for tag in interests.iter() {
            prop_assert!(config.interests.contains(tag));
        }
    }

    #[test]
    fn prop_traits_monotonic(a in 0u8..=100, b in 0u8..=100) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank_formality(Formality::from_slider(lo)) <= rank_formality(Formality::from_slider(hi)));
        prop_assert!(rank_humor(HumorLevel::from_slider(lo)) <= rank_humor(HumorLevel::from_slider(hi)));
        prop_assert!(rank_tone(Tone::from_slider(lo)) <= rank_tone(Tone::from_slider(hi)));
    }

    #[test]
    fn prop_representative_sliders_round_trip(sliders in arb_sliders(), base in arb_sliders()) {
        let config = derive_config(&sliders, &InterestSet::new());
        let rep = representative_sliders(&config, &base);
        let again = derive_config(&rep, &InterestSet::new());
        prop_assert_eq!(again.formality, config.formality);
        prop_assert_eq!(again.humor_level, config.humor_level);
        prop_assert_eq!(again.tone, config.tone);
        prop_assert_eq!(rep.warmth(), base.warmth());
        prop_assert_eq!(rep.traditionalism(), base.traditionalism());
    }
}

fn rank_formality(f: Formality) -> u8 {
    match f {
        Formality::Casual => 0,
        Formality::SemiFormal => 1,
        Formality::Formal => 2,
    }
}

fn rank_humor(h: HumorLevel) -> u8 {
    match h {
        HumorLevel::None => 0,
        HumorLevel::Mild => 1,
        HumorLevel::Moderate => 2,
        HumorLevel::High => 3,
    }
}

fn rank_tone(t: Tone) -> u8 {
    match t {
        Tone::Gentle => 0,
        Tone::Balanced => 1,
        Tone::Confident => 2,
        Tone::Assertive => 3,
    }
}

// ============================================================================
// Boundary table
// ============================================================================

#[test]
fn test_threshold_boundaries() {
    let cases: &[(u8, Formality, HumorLevel, Tone)] = &[
        (20, Formality::Casual, HumorLevel::None, Tone::Gentle),
        (21, Formality::Casual, HumorLevel::Mild, Tone::Gentle),
        (30, Formality::Casual, HumorLevel::Mild, Tone::Gentle),
        (31, Formality::SemiFormal, HumorLevel::Mild, Tone::Balanced),
        (50, Formality::SemiFormal, HumorLevel::Mild, Tone::Balanced),
        (51, Formality::SemiFormal, HumorLevel::Moderate, Tone::Balanced),
        (60, Formality::SemiFormal, HumorLevel::Moderate, Tone::Balanced),
        (61, Formality::SemiFormal, HumorLevel::Moderate, Tone::Confident),
        (70, Formality::SemiFormal, HumorLevel::Moderate, Tone::Confident),
        (71, Formality::Formal, HumorLevel::Moderate, Tone::Confident),
        (80, Formality::Formal, HumorLevel::Moderate, Tone::Confident),
        (81, Formality::Formal, HumorLevel::High, Tone::Confident),
        (85, Formality::Formal, HumorLevel::High, Tone::Confident),
        (86, Formality::Formal, HumorLevel::High, Tone::Assertive),
    ];

    for &(v, formality, humor, tone) in cases {
        let v = i64::from(v);
        let config = derive_config(&SliderSet::new(v, v, v, 50, 0), &InterestSet::new());
        assert_eq!(config.formality, formality, "formality at {v}");
        assert_eq!(config.humor_level, humor, "humor at {v}");
        assert_eq!(config.tone, tone, "tone at {v}");
    }
}

#[test]
fn test_set_slider_examples() {
    let s = SliderSet::default();
    assert_eq!(set_slider(&s, "humor", 150).unwrap().humor(), 100);
    assert_eq!(set_slider(&s, "humor", -5).unwrap().humor(), 0);
}

#[test]
fn test_rule_at_eighty_adds_single_tag() {
    let sliders = SliderSet::new(50, 50, 50, 50, 80);
    let interests: InterestSet = ["family"].into_iter().collect();
    let once = resolve_config(&sliders, &interests);
    let again = resolve_config(&sliders, &once.interests);
    assert_eq!(again.interests.to_vec(), vec!["family", TRADITIONAL_VALUES_TAG]);
}

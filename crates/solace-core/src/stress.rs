//! Stress-signal detection.
//!
//! A shallow local heuristic, not a model: user text is scanned for a fixed
//! ordered list of stress keywords, and the first match (in list order, not
//! text order) pairs with one guided-relaxation activity chosen uniformly at
//! random from a fixed catalog. The random source is injected behind
//! [`ActivityPicker`] so tests can pin the selection.

use rand::Rng;

/// Canonical keyword list. Order matters: the first keyword found in the
/// input wins, scanning this list top to bottom.
pub const STRESS_KEYWORDS: [&str; 8] = [
    "stress",
    "anxiety",
    "worried",
    "panic",
    "overwhelmed",
    "nervous",
    "tense",
    "pressure",
];

/// A guided-relaxation activity descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidedActivity {
    pub kind: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Fixed catalog of guided activities offered during a wellbeing pause.
pub const GUIDED_ACTIVITIES: [GuidedActivity; 4] = [
    GuidedActivity {
        kind: "breathing",
        title: "Box Breathing",
        description: "Breathe in for four counts, hold for four, breathe out for four, and hold for four. Repeat for one minute.",
    },
    GuidedActivity {
        kind: "grounding",
        title: "5-4-3-2-1 Grounding",
        description: "Name five things you can see, four you can touch, three you can hear, two you can smell, and one you can taste.",
    },
    GuidedActivity {
        kind: "muscle-relaxation",
        title: "Progressive Muscle Relaxation",
        description: "Tense each muscle group for five seconds, then release, moving slowly from your shoulders down to your feet.",
    },
    GuidedActivity {
        kind: "visualization",
        title: "Guided Imagery",
        description: "Close your eyes and picture a calm, safe place. Notice its colors, sounds, and textures for a few slow breaths.",
    },
];

/// A detected stress signal: the matched keyword and the activity to offer.
///
/// Ephemeral - it exists only between detection and resolution (activity
/// completion or dismissal) and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressTrigger {
    pub keyword: &'static str,
    pub activity: GuidedActivity,
}

/// Selects one activity from the catalog.
pub trait ActivityPicker: Send + Sync {
    fn pick(&self, catalog: &'static [GuidedActivity]) -> GuidedActivity;
}

/// Uniform random selection via the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomActivityPicker;

impl ActivityPicker for RandomActivityPicker {
    fn pick(&self, catalog: &'static [GuidedActivity]) -> GuidedActivity {
        let index = rand::thread_rng().gen_range(0..catalog.len());
        catalog[index]
    }
}

/// Deterministic selection of a fixed catalog index, for tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedActivityPicker(pub usize);

impl ActivityPicker for FixedActivityPicker {
    fn pick(&self, catalog: &'static [GuidedActivity]) -> GuidedActivity {
        catalog[self.0 % catalog.len()]
    }
}

/// Scans user text for a stress signal using the default random picker.
pub fn detect(text: &str) -> Option<StressTrigger> {
    detect_with(text, &RandomActivityPicker)
}

/// Scans user text for a stress signal.
///
/// Case-insensitive. Returns the first keyword from [`STRESS_KEYWORDS`]
/// that occurs anywhere in the text, paired with one activity from the
/// picker. Empty or whitespace-only text never triggers. Never fails.
pub fn detect_with(text: &str, picker: &dyn ActivityPicker) -> Option<StressTrigger> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let keyword = STRESS_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| normalized.contains(keyword))?;

    Some(StressTrigger {
        keyword,
        activity: picker.pick(&GUIDED_ACTIVITIES),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_keyword_in_list_order_wins() {
        // "overwhelmed" precedes "nervous" in the canonical list even though
        // "nervous" appears first in the text.
        let trigger = detect_with(
            "I'm nervous and completely overwhelmed",
            &FixedActivityPicker(0),
        )
        .unwrap();
        assert_eq!(trigger.keyword, "overwhelmed");

        let trigger =
            detect_with("I feel so overwhelmed and anxious", &FixedActivityPicker(0)).unwrap();
        assert_eq!(trigger.keyword, "overwhelmed");
    }

    #[test]
    fn test_neutral_text_does_not_trigger() {
        assert!(detect("Let's discuss scheduling").is_none());
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        let trigger = detect_with("SO MUCH PRESSURE at work", &FixedActivityPicker(0)).unwrap();
        assert_eq!(trigger.keyword, "pressure");
    }

    #[test]
    fn test_empty_and_whitespace_never_trigger() {
        assert!(detect("").is_none());
        assert!(detect("   \n\t").is_none());
    }

    #[test]
    fn test_fixed_picker_pins_the_activity() {
        let trigger = detect_with("under a lot of stress", &FixedActivityPicker(2)).unwrap();
        assert_eq!(trigger.activity, GUIDED_ACTIVITIES[2]);
    }

    #[test]
    fn test_random_picker_stays_in_catalog() {
        for _ in 0..32 {
            let trigger = detect("panic again").unwrap();
            assert!(GUIDED_ACTIVITIES.contains(&trigger.activity));
        }
    }
}

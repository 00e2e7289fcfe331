use crate::models::{LifestyleCategory, LifestyleTag};

/// One classification rule: the tag label assigned when any of the keywords
/// appears in the normalized answer text.
struct Rule {
    label: &'static str,
    keywords: &'static [&'static str],
}

/// Ordered rule table for one category. Rules are checked top to bottom and
/// the first match wins, so earlier rules take priority when keyword sets
/// overlap. The fallback label is assigned when no rule matches; it is never
/// empty.
struct CategoryRules {
    category: LifestyleCategory,
    rules: &'static [Rule],
    fallback: &'static str,
}

// Priority: early-bird before night-owl, since answers that mention a
// bedtime hour ("11pm") can also contain late-night vocabulary.
const SLEEP_RULES: CategoryRules = CategoryRules {
    category: LifestyleCategory::SleepSchedule,
    rules: &[
        Rule {
            label: "early-bird",
            keywords: &[
                "10pm", "10 pm", "11pm", "11 pm", "early bird", "early riser", "wake at 6",
                "wake at 7", "wake up at 6", "wake up at 7", "up at 6", "up at 7",
            ],
        },
        Rule {
            label: "night-owl",
            keywords: &[
                "midnight", "night owl", "2am", "2 am", "3am", "3 am", "stay up late",
                "late night", "sleep in", "noon",
            ],
        },
    ],
    fallback: "flexible-sleep",
};

// Priority: high before relaxed; "very clean but a bit messy sometimes"
// reads as high standards first.
const CLEANLINESS_RULES: CategoryRules = CategoryRules {
    category: LifestyleCategory::Cleanliness,
    rules: &[
        Rule {
            label: "high-cleanliness",
            keywords: &["very clean", "organized", "organised", "tidy", "spotless", "neat", "immaculate"],
        },
        Rule {
            label: "relaxed-cleanliness",
            keywords: &["messy", "clutter", "laid back", "laid-back", "lived-in", "not a big deal"],
        },
    ],
    fallback: "moderate-cleanliness",
};

// Priority: quiet before tolerant; "quiet" is the stronger, more specific
// signal for shared living.
const NOISE_RULES: CategoryRules = CategoryRules {
    category: LifestyleCategory::NoiseTolerance,
    rules: &[
        Rule {
            label: "quiet-preference",
            keywords: &["quiet", "peaceful", "silence", "silent", "calm"],
        },
        Rule {
            label: "noise-tolerant",
            keywords: &["background noise", "some noise", "music on", "lively", "don't mind noise"],
        },
    ],
    fallback: "balanced-noise",
};

// Priority: high, then moderate, then low. Frequency words are checked from
// most to least social so "I host parties but rarely on weekdays" lands on
// the high end.
const SOCIAL_RULES: CategoryRules = CategoryRules {
    category: LifestyleCategory::SocialFrequency,
    rules: &[
        Rule {
            label: "high-social",
            keywords: &[
                "every day", "most nights", "all the time", "party", "parties", "constantly",
                "love hosting",
            ],
        },
        Rule {
            label: "moderate-social",
            keywords: &[
                "occasionally", "sometimes", "weekends", "once or twice", "twice a month",
                "couple times a month",
            ],
        },
        Rule {
            label: "low-social",
            keywords: &["rarely", "never", "hardly ever", "almost never", "keep to myself"],
        },
    ],
    fallback: "occasional-social",
};

// Priority: boundaries before communication before companionship; trust and
// personal-space vocabulary is the most common and most specific.
const VALUES_RULES: CategoryRules = CategoryRules {
    category: LifestyleCategory::RelationshipValues,
    rules: &[
        Rule {
            label: "boundaries-focused",
            keywords: &["trust", "respect", "personal space", "privacy", "boundaries"],
        },
        Rule {
            label: "communication-focused",
            keywords: &["communication", "communicate", "honest", "openness", "talk things"],
        },
        Rule {
            label: "companionship-focused",
            keywords: &["friendship", "hang out", "do things together", "companion", "best friend"],
        },
    ],
    fallback: "mutual-respect",
};

const TABLES: [&CategoryRules; 5] = [
    &SLEEP_RULES,
    &CLEANLINESS_RULES,
    &NOISE_RULES,
    &SOCIAL_RULES,
    &VALUES_RULES,
];

/// Derive a lifestyle tag from a free-text answer.
///
/// Pure and deterministic: the same (question_index, text) pair always
/// yields the same tag. Question indexes beyond the fixed category set get a
/// generic free-text tag so callers configured with more questions never see
/// an empty classification.
pub fn analyze(question_index: usize, text: &str) -> LifestyleTag {
    let Some(table) = TABLES.get(question_index) else {
        return LifestyleTag::free_text(question_index);
    };

    let normalized = text.to_lowercase();
    let label = classify(table, &normalized);
    LifestyleTag::categorized(table.category, label)
}

/// First matching rule wins; fall back to the category's generic label.
#[inline]
fn classify(table: &CategoryRules, normalized: &str) -> &'static str {
    table
        .rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| normalized.contains(kw)))
        .map(|rule| rule.label)
        .unwrap_or(table.fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_early_bird() {
        let tag = analyze(0, "I usually sleep by 11 PM and wake up at 7 AM");
        assert_eq!(tag.label, "early-bird");
        assert_eq!(tag.category, Some(LifestyleCategory::SleepSchedule));
    }

    #[test]
    fn test_sleep_night_owl() {
        let tag = analyze(0, "I'm a night owl, usually up past midnight");
        assert_eq!(tag.label, "night-owl");
    }

    #[test]
    fn test_sleep_fallback() {
        let tag = analyze(0, "it depends on my shift that week");
        assert_eq!(tag.label, "flexible-sleep");
    }

    #[test]
    fn test_cleanliness_priority_order() {
        // Both rule sets match; the high-cleanliness rule is listed first.
        let tag = analyze(1, "I'm very clean although my desk can get messy");
        assert_eq!(tag.label, "high-cleanliness");
    }

    #[test]
    fn test_noise_quiet() {
        let tag = analyze(2, "I prefer a quiet environment during work hours");
        assert_eq!(tag.label, "quiet-preference");
    }

    #[test]
    fn test_social_moderate() {
        let tag = analyze(3, "I occasionally have friends over on weekends");
        assert_eq!(tag.label, "moderate-social");
    }

    #[test]
    fn test_values_boundaries() {
        let tag = analyze(4, "Trust and respect for personal space matter most");
        assert_eq!(tag.label, "boundaries-focused");
    }

    #[test]
    fn test_deterministic() {
        let a = analyze(3, "friends over sometimes");
        let b = analyze(3, "friends over sometimes");
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_range_index_is_free_text() {
        let tag = analyze(9, "anything at all");
        assert_eq!(tag.category, None);
        assert!(!tag.label.is_empty());
    }

    #[test]
    fn test_empty_text_hits_fallback() {
        for index in 0..5 {
            let tag = analyze(index, "");
            assert!(!tag.label.is_empty());
        }
    }
}

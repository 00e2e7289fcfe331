use std::collections::HashMap;
use thiserror::Error;

use crate::models::{CandidateProfile, LifestyleCategory, ScoringWeights};

/// Errors raised while scoring a single candidate. A scoring error skips the
/// candidate; it never aborts the whole ranking run.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("candidate has an empty lifestyle profile")]
    EmptyProfile,
}

/// Per-category alignment for one candidate.
#[derive(Debug, Clone)]
pub struct CategoryScore {
    pub category: LifestyleCategory,
    /// Alignment in [0, 1].
    pub sub_score: f64,
    /// Weighted contribution to the final score.
    pub contribution: f64,
}

/// Calculate a compatibility score (0-100) plus match reasons for a candidate.
///
/// Each category contributes a sub-score in [0, 1] comparing the user's tag
/// label with the candidate's profile attribute; sub-scores combine through
/// the normalized weights. Missing candidate attributes contribute zero.
pub fn calculate_compatibility(
    user_tags: &HashMap<LifestyleCategory, String>,
    candidate: &CandidateProfile,
    weights: &ScoringWeights,
) -> Result<(u8, Vec<String>), ScoringError> {
    if candidate.lifestyle.is_empty() {
        return Err(ScoringError::EmptyProfile);
    }

    let mut scores = Vec::with_capacity(LifestyleCategory::ALL.len());
    let mut total = 0.0;

    for category in LifestyleCategory::ALL {
        let weight = weights.for_category(category);
        let sub_score = match (user_tags.get(&category), candidate.lifestyle.get(&category)) {
            (Some(user), Some(theirs)) => category_alignment(category, user, theirs),
            _ => 0.0,
        };
        let contribution = sub_score * weight;
        total += contribution;

        scores.push(CategoryScore {
            category,
            sub_score,
            contribution,
        });
    }

    let score = (total * 100.0).round().clamp(0.0, 100.0) as u8;
    let reasons = match_reasons(&scores, user_tags);

    Ok((score, reasons))
}

/// Alignment of two category values in [0, 1].
///
/// Values are compared on normalized label text, so pool files may carry
/// either the analyzer's slugs ("early-bird") or looser phrasing
/// ("Early bird, 11 PM - 7 AM").
fn category_alignment(category: LifestyleCategory, user: &str, theirs: &str) -> f64 {
    let user = user.to_lowercase();
    let theirs = theirs.to_lowercase();

    match category {
        LifestyleCategory::SleepSchedule => pole_alignment(
            sleep_pole(&user),
            sleep_pole(&theirs),
        ),
        LifestyleCategory::NoiseTolerance => pole_alignment(
            noise_pole(&user),
            noise_pole(&theirs),
        ),
        LifestyleCategory::Cleanliness => {
            ordinal_alignment(cleanliness_level(&user), cleanliness_level(&theirs))
        }
        LifestyleCategory::SocialFrequency => {
            ordinal_alignment(social_level(&user), social_level(&theirs))
        }
        LifestyleCategory::RelationshipValues => {
            if user == theirs {
                1.0
            } else {
                0.4
            }
        }
    }
}

/// Same pole aligns fully, an unclassified side aligns partially, opposite
/// poles barely.
#[inline]
fn pole_alignment(a: Option<bool>, b: Option<bool>) -> f64 {
    match (a, b) {
        (Some(x), Some(y)) if x == y => 1.0,
        (Some(_), Some(_)) => 0.2,
        _ => 0.6,
    }
}

/// Ordinal scales score by distance: adjacent levels align at 0.5.
#[inline]
fn ordinal_alignment(a: u8, b: u8) -> f64 {
    1.0 - (a as f64 - b as f64).abs() / 2.0
}

#[inline]
fn sleep_pole(value: &str) -> Option<bool> {
    if value.contains("early") {
        Some(true)
    } else if value.contains("night") || value.contains("owl") || value.contains("late") {
        Some(false)
    } else {
        None
    }
}

#[inline]
fn noise_pole(value: &str) -> Option<bool> {
    if value.contains("quiet") || value.contains("silent") || value.contains("peaceful") {
        Some(true)
    } else if value.contains("balanced") {
        // The analyzer's fallback label; deliberately unclassified.
        None
    } else if value.contains("tolerant") || value.contains("noise") || value.contains("lively") {
        Some(false)
    } else {
        None
    }
}

#[inline]
fn cleanliness_level(value: &str) -> u8 {
    if value.contains("high") || value.contains("very") || value.contains("spotless") {
        2
    } else if value.contains("relaxed") || value.contains("low") || value.contains("messy") {
        0
    } else {
        1
    }
}

#[inline]
fn social_level(value: &str) -> u8 {
    if value.contains("high") || value.contains("frequent") || value.contains("very social") {
        2
    } else if value.contains("low") || value.contains("rare") || value.contains("minimal") {
        0
    } else {
        1
    }
}

/// Human-readable justifications, generated from the categories with the
/// highest weighted contribution: up to four, descending, with category
/// declaration order breaking ties so output is deterministic.
fn match_reasons(
    scores: &[CategoryScore],
    user_tags: &HashMap<LifestyleCategory, String>,
) -> Vec<String> {
    let mut ranked: Vec<&CategoryScore> =
        scores.iter().filter(|s| s.sub_score > 0.0).collect();

    ranked.sort_by(|a, b| {
        b.contribution
            .partial_cmp(&a.contribution)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
        .iter()
        .take(4)
        .map(|s| reason_text(s.category, user_tags))
        .collect()
}

fn reason_text(
    category: LifestyleCategory,
    user_tags: &HashMap<LifestyleCategory, String>,
) -> String {
    let label = user_tags
        .get(&category)
        .map(|l| l.replace('-', " "))
        .unwrap_or_else(|| category.slug().replace('-', " "));

    match category {
        LifestyleCategory::SleepSchedule => format!("Similar sleep schedule ({})", label),
        LifestyleCategory::Cleanliness => format!("Shared cleanliness standards ({})", label),
        LifestyleCategory::NoiseTolerance => format!("Compatible noise preference ({})", label),
        LifestyleCategory::SocialFrequency => format!("Aligned social habits ({})", label),
        LifestyleCategory::RelationshipValues => format!("Matching relationship values ({})", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoomOffer;

    fn user_tags() -> HashMap<LifestyleCategory, String> {
        HashMap::from([
            (LifestyleCategory::SleepSchedule, "early-bird".to_string()),
            (LifestyleCategory::Cleanliness, "high-cleanliness".to_string()),
            (LifestyleCategory::NoiseTolerance, "quiet-preference".to_string()),
            (LifestyleCategory::SocialFrequency, "moderate-social".to_string()),
            (
                LifestyleCategory::RelationshipValues,
                "boundaries-focused".to_string(),
            ),
        ])
    }

    fn candidate(lifestyle: &[(LifestyleCategory, &str)]) -> CandidateProfile {
        CandidateProfile {
            id: "c1".to_string(),
            name: "Test Candidate".to_string(),
            age: 25,
            occupation: "Engineer".to_string(),
            lifestyle: lifestyle
                .iter()
                .map(|(c, v)| (*c, v.to_string()))
                .collect(),
            room: RoomOffer {
                number: "A-101".to_string(),
                floor: 1,
                amenities: vec![],
                rent: 1000,
            },
        }
    }

    #[test]
    fn test_identical_profile_scores_100() {
        let c = candidate(&[
            (LifestyleCategory::SleepSchedule, "early-bird"),
            (LifestyleCategory::Cleanliness, "high-cleanliness"),
            (LifestyleCategory::NoiseTolerance, "quiet-preference"),
            (LifestyleCategory::SocialFrequency, "moderate-social"),
            (LifestyleCategory::RelationshipValues, "boundaries-focused"),
        ]);

        let (score, reasons) =
            calculate_compatibility(&user_tags(), &c, &ScoringWeights::default()).unwrap();
        assert_eq!(score, 100);
        assert_eq!(reasons.len(), 4);
    }

    #[test]
    fn test_loose_phrasing_still_aligns() {
        let c = candidate(&[
            (LifestyleCategory::SleepSchedule, "Early bird (11 PM - 7 AM)"),
            (LifestyleCategory::Cleanliness, "Very high"),
            (LifestyleCategory::NoiseTolerance, "Quiet"),
            (LifestyleCategory::SocialFrequency, "Moderate"),
            (LifestyleCategory::RelationshipValues, "boundaries-focused"),
        ]);

        let (score, _) =
            calculate_compatibility(&user_tags(), &c, &ScoringWeights::default()).unwrap();
        assert_eq!(score, 100);
    }

    #[test]
    fn test_opposite_profile_scores_low() {
        let c = candidate(&[
            (LifestyleCategory::SleepSchedule, "night-owl"),
            (LifestyleCategory::Cleanliness, "relaxed-cleanliness"),
            (LifestyleCategory::NoiseTolerance, "noise-tolerant"),
            (LifestyleCategory::SocialFrequency, "high-social"),
            (LifestyleCategory::RelationshipValues, "companionship-focused"),
        ]);

        let (score, _) =
            calculate_compatibility(&user_tags(), &c, &ScoringWeights::default()).unwrap();
        assert!(score < 40, "expected a low score, got {}", score);
    }

    #[test]
    fn test_empty_profile_is_error() {
        let c = candidate(&[]);
        let result = calculate_compatibility(&user_tags(), &c, &ScoringWeights::default());
        assert!(matches!(result, Err(ScoringError::EmptyProfile)));
    }

    #[test]
    fn test_score_in_range_and_reasons_ordered() {
        let c = candidate(&[
            (LifestyleCategory::SleepSchedule, "early-bird"),
            (LifestyleCategory::Cleanliness, "moderate-cleanliness"),
            (LifestyleCategory::NoiseTolerance, "balanced-noise"),
            (LifestyleCategory::SocialFrequency, "low-social"),
            (LifestyleCategory::RelationshipValues, "mutual-respect"),
        ]);

        let (score, reasons) =
            calculate_compatibility(&user_tags(), &c, &ScoringWeights::default()).unwrap();
        assert!(score <= 100);
        assert!(!reasons.is_empty() && reasons.len() <= 4);
        // Sleep aligns fully and carries the largest weight, so it leads.
        assert!(reasons[0].contains("sleep schedule"));
    }

    #[test]
    fn test_reasons_deterministic() {
        let c = candidate(&[
            (LifestyleCategory::SleepSchedule, "early-bird"),
            (LifestyleCategory::Cleanliness, "high-cleanliness"),
            (LifestyleCategory::NoiseTolerance, "quiet-preference"),
            (LifestyleCategory::SocialFrequency, "moderate-social"),
            (LifestyleCategory::RelationshipValues, "boundaries-focused"),
        ]);

        let weights = ScoringWeights::default();
        let first = calculate_compatibility(&user_tags(), &c, &weights).unwrap();
        let second = calculate_compatibility(&user_tags(), &c, &weights).unwrap();
        assert_eq!(first.1, second.1);
    }
}

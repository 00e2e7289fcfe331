use std::collections::HashMap;

use crate::core::scoring::calculate_compatibility;
use crate::models::{
    CandidateProfile, LifestyleCategory, MatchResult, ScoringWeights, SkippedCandidate,
    SurveyResult,
};

/// Result of one ranking run.
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub matches: Vec<MatchResult>,
    /// Candidates omitted from the ranking, each with an explicit reason.
    pub skipped: Vec<SkippedCandidate>,
    pub total_candidates: usize,
}

/// Compatibility matching engine.
///
/// A pure transform: given a completed survey and a candidate pool it
/// produces a fresh ranked sequence on every invocation, mutating neither
/// input. Malformed candidates are skipped and reported, never fatal.
#[derive(Debug, Clone)]
pub struct CompatibilityEngine {
    weights: ScoringWeights,
}

impl CompatibilityEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Rank the candidate pool against a completed survey.
    ///
    /// Ordering is a total order: compatibility score descending, with
    /// candidate id ascending as the tie-break. The pool's own iteration
    /// order never influences the output.
    pub fn rank(
        &self,
        survey: &SurveyResult,
        candidates: &[CandidateProfile],
        limit: usize,
    ) -> RankingOutcome {
        let total_candidates = candidates.len();
        let user_tags = Self::user_tag_map(survey);

        let mut matches = Vec::with_capacity(total_candidates);
        let mut skipped = Vec::new();

        for candidate in candidates {
            match calculate_compatibility(&user_tags, candidate, &self.weights) {
                Ok((score, reasons)) => matches.push(MatchResult {
                    candidate_id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    age: candidate.age,
                    occupation: candidate.occupation.clone(),
                    compatibility_score: score,
                    match_reasons: reasons,
                    // Room suggestion is the offer already attached to the
                    // candidate; no cross-candidate allocation here.
                    room: candidate.room.clone(),
                }),
                Err(e) => {
                    tracing::warn!(
                        "Skipping candidate {} in ranking run: {}",
                        candidate.id,
                        e
                    );
                    skipped.push(SkippedCandidate {
                        candidate_id: candidate.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        matches.sort_by(|a, b| {
            b.compatibility_score
                .cmp(&a.compatibility_score)
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });
        matches.truncate(limit);

        RankingOutcome {
            matches,
            skipped,
            total_candidates,
        }
    }

    /// Collapse the survey into one tag label per category.
    fn user_tag_map(survey: &SurveyResult) -> HashMap<LifestyleCategory, String> {
        survey
            .responses
            .iter()
            .filter_map(|record| {
                record
                    .analysis
                    .category
                    .map(|category| (category, record.analysis.label.clone()))
            })
            .collect()
    }
}

impl Default for CompatibilityEngine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

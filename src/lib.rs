//! Roomie Algo - Voice-powered roommate compatibility matching service
//!
//! This library drives a short spoken lifestyle survey, turns each answer
//! into a lifestyle tag, and ranks a candidate pool (with attached room
//! offers) by compatibility with the completed survey.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;
pub mod voice;

// Re-export commonly used types
pub use core::{analyze, CompatibilityEngine, SurveySession, SURVEY_QUESTIONS};
pub use models::{
    CandidateProfile, FindMatchesRequest, FindMatchesResponse, LifestyleCategory, LifestyleTag,
    MatchResult, ScoringWeights, SurveyResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let tag = analyze(0, "I'm usually in bed by 10pm");
        assert_eq!(tag.category, Some(LifestyleCategory::SleepSchedule));
    }
}

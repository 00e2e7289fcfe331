// Core algorithm exports
pub mod analyzer;
pub mod engine;
pub mod scoring;
pub mod session;

pub use analyzer::analyze;
pub use engine::{CompatibilityEngine, RankingOutcome};
pub use scoring::{calculate_compatibility, ScoringError};
pub use session::{SessionState, Submission, SurveyError, SurveySession, SURVEY_QUESTIONS};

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AnswerRecord, AudioClip, CandidateProfile, LifestyleCategory, LifestyleTag, MatchResult,
    Question, RoomOffer, ScoringWeights, SkippedCandidate, SurveyResult,
};
pub use requests::{FindMatchesRequest, SubmitAnswerRequest};
pub use responses::{
    AdminStatsResponse, ErrorResponse, FindMatchesResponse, HealthResponse, StartSurveyResponse,
    SubmitAnswerResponse, VoiceTestResponse,
};

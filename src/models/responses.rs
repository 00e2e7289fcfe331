use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{
    LifestyleTag, MatchResult, Question, SkippedCandidate, SurveyResult,
};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "configured" when the remote voice path is enabled, "disabled" otherwise.
    pub voice: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response for starting a new survey session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSurveyResponse {
    pub session_id: Uuid,
    pub questions: Vec<Question>,
}

/// Response for a submitted answer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    pub question_index: usize,
    pub transcript: String,
    pub analysis: LifestyleTag,
    /// Which transcription path produced the transcript: "local", "remote"
    /// or "text" when the client submitted a transcript directly.
    pub source: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SurveyResult>,
}

/// Response for the find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse {
    pub matches: Vec<MatchResult>,
    pub skipped: Vec<SkippedCandidate>,
    pub total_candidates: usize,
}

/// Remote voice service connectivity probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceTestResponse {
    pub configured: bool,
    pub reachable: bool,
}

/// Admin dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub sessions_started: u64,
    pub surveys_completed: u64,
    pub ranking_runs: u64,
    pub pool_size: usize,
    pub rooms_listed: usize,
}

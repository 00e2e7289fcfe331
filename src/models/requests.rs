use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to submit one survey answer.
///
/// Exactly one of `transcript` or `audio` is expected: a transcript is
/// submitted as-is, audio (base64) runs the full voice intake pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[serde(alias = "session_id", rename = "sessionId")]
    pub session_id: Uuid,
    #[serde(alias = "question_index", rename = "questionIndex")]
    pub question_index: usize,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default = "default_audio_format")]
    #[serde(alias = "audio_format", rename = "audioFormat")]
    pub audio_format: String,
}

fn default_audio_format() -> String {
    "webm".to_string()
}

/// Request to rank the candidate pool against a completed survey.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[serde(alias = "session_id", rename = "sessionId")]
    pub session_id: Uuid,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}

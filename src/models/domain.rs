use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One survey question, ordered and immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub index: usize,
    pub text: String,
}

/// Lifestyle category covered by the survey, one per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifestyleCategory {
    SleepSchedule,
    Cleanliness,
    NoiseTolerance,
    SocialFrequency,
    RelationshipValues,
}

impl LifestyleCategory {
    /// Declaration order doubles as the deterministic tie-break for
    /// reason generation.
    pub const ALL: [LifestyleCategory; 5] = [
        LifestyleCategory::SleepSchedule,
        LifestyleCategory::Cleanliness,
        LifestyleCategory::NoiseTolerance,
        LifestyleCategory::SocialFrequency,
        LifestyleCategory::RelationshipValues,
    ];

    /// Category for a question index, if the index is within the fixed set.
    pub fn for_question(index: usize) -> Option<LifestyleCategory> {
        Self::ALL.get(index).copied()
    }

    pub fn slug(&self) -> &'static str {
        match self {
            LifestyleCategory::SleepSchedule => "sleep-schedule",
            LifestyleCategory::Cleanliness => "cleanliness",
            LifestyleCategory::NoiseTolerance => "noise-tolerance",
            LifestyleCategory::SocialFrequency => "social-frequency",
            LifestyleCategory::RelationshipValues => "relationship-values",
        }
    }
}

/// Semantic classification of one survey answer.
///
/// The label is never empty: every category has a fallback label, and
/// out-of-range question indexes get a generic free-text tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleTag {
    pub category: Option<LifestyleCategory>,
    pub label: String,
}

impl LifestyleTag {
    pub fn categorized(category: LifestyleCategory, label: &str) -> Self {
        Self {
            category: Some(category),
            label: label.to_string(),
        }
    }

    /// Generic tag for question indexes beyond the known categories.
    pub fn free_text(question_index: usize) -> Self {
        Self {
            category: None,
            label: format!("response-{}", question_index),
        }
    }
}

/// Captured audio artifact for one question cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub format: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, format: impl Into<String>) -> Self {
        Self {
            bytes,
            format: format.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One answered question: transcript plus derived lifestyle signal.
/// Immutable after creation; owned exclusively by the survey session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_index: usize,
    pub raw_transcript: String,
    pub analysis: LifestyleTag,
    #[serde(skip)]
    pub source_audio: Option<AudioClip>,
}

/// Completed survey: one record per question, in question order.
/// Frozen once the session reaches its terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResult {
    pub responses: Vec<AnswerRecord>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl SurveyResult {
    /// Lifestyle tag for a category, if any answered question produced one.
    pub fn tag_for(&self, category: LifestyleCategory) -> Option<&LifestyleTag> {
        self.responses
            .iter()
            .map(|r| &r.analysis)
            .find(|tag| tag.category == Some(category))
    }
}

/// Room attached to a candidate in the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOffer {
    pub number: String,
    pub floor: u8,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub rent: u32,
}

/// Candidate roommate profile supplied by the external pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub occupation: String,
    #[serde(default)]
    pub lifestyle: HashMap<LifestyleCategory, String>,
    pub room: RoomOffer,
}

/// Ranked match for one candidate, recomputed on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(rename = "id")]
    pub candidate_id: String,
    pub name: String,
    pub age: u8,
    pub occupation: String,
    pub compatibility_score: u8,
    pub match_reasons: Vec<String>,
    pub room: RoomOffer,
}

/// Candidate omitted from a ranking run, with the reason for omission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCandidate {
    pub candidate_id: String,
    pub reason: String,
}

/// Per-category scoring weights. Must sum to 1.0 so the combined score
/// stays in the 0-100 range before clamping.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub sleep: f64,
    pub cleanliness: f64,
    pub noise: f64,
    pub social: f64,
    pub values: f64,
}

impl ScoringWeights {
    pub fn for_category(&self, category: LifestyleCategory) -> f64 {
        match category {
            LifestyleCategory::SleepSchedule => self.sleep,
            LifestyleCategory::Cleanliness => self.cleanliness,
            LifestyleCategory::NoiseTolerance => self.noise,
            LifestyleCategory::SocialFrequency => self.social,
            LifestyleCategory::RelationshipValues => self.values,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            sleep: 0.25,
            cleanliness: 0.25,
            noise: 0.20,
            social: 0.15,
            values: 0.15,
        }
    }
}

use thiserror::Error;

use crate::core::analyzer;
use crate::models::{AnswerRecord, AudioClip, Question, SurveyResult};

/// The fixed roommate-compatibility survey, one question per lifestyle
/// category in category order.
pub const SURVEY_QUESTIONS: [&str; 5] = [
    "What time do you usually go to bed and wake up?",
    "How would you describe your cleanliness level and expectations?",
    "Do you prefer a quiet environment or are you okay with some background noise?",
    "How often do you have friends or guests over?",
    "What's most important to you in a roommate relationship?",
];

/// Survey sequencing errors. These are usage errors surfaced immediately to
/// the caller; none of them advances the question pointer.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("answer transcript is empty")]
    EmptyAnswer,

    #[error("survey session is already complete")]
    SessionClosed,

    #[error("answer targets question {got} but the current question is {expected}")]
    QuestionMismatch { expected: usize, got: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Complete,
}

/// Outcome of a successful answer submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub record: AnswerRecord,
    pub completed: bool,
    /// The full survey result, present only on the completing submission.
    pub result: Option<SurveyResult>,
}

/// Sequences the question list and accumulates per-question records.
///
/// Strictly sequential: one answer per question, in order, with the result
/// sequence append-only while active and frozen at completion.
#[derive(Debug)]
pub struct SurveySession {
    questions: Vec<Question>,
    records: Vec<AnswerRecord>,
    state: SessionState,
    result: Option<SurveyResult>,
}

impl SurveySession {
    /// Session over the fixed five-question survey.
    pub fn new() -> Self {
        Self::with_questions(SURVEY_QUESTIONS.iter().map(|q| q.to_string()).collect())
    }

    /// Session over an arbitrary ordered question list (the engine supports
    /// N questions; the analyzer falls back to free-text tags past the
    /// known categories).
    pub fn with_questions(texts: Vec<String>) -> Self {
        let questions = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Question { index, text })
            .collect();

        Self {
            questions,
            records: Vec::new(),
            state: SessionState::Active,
            result: None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Index of the question awaiting an answer.
    pub fn current_index(&self) -> usize {
        self.records.len()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Frozen survey result, available once the session is complete.
    pub fn result(&self) -> Option<&SurveyResult> {
        self.result.as_ref()
    }

    /// Submit the transcript for the current question.
    ///
    /// Builds the answer record (transcript + analyzer tag), appends it and
    /// advances the pointer. The completing submission carries the full
    /// SurveyResult exactly once; afterwards the session rejects submissions
    /// with `SessionClosed`.
    pub fn submit_answer(
        &mut self,
        transcript: &str,
        source_audio: Option<AudioClip>,
    ) -> Result<Submission, SurveyError> {
        if self.state == SessionState::Complete {
            return Err(SurveyError::SessionClosed);
        }
        if transcript.trim().is_empty() {
            return Err(SurveyError::EmptyAnswer);
        }

        let question_index = self.current_index();
        let record = AnswerRecord {
            question_index,
            raw_transcript: transcript.to_string(),
            analysis: analyzer::analyze(question_index, transcript),
            source_audio,
        };

        self.records.push(record.clone());

        let completed = self.records.len() == self.questions.len();
        let result = if completed {
            self.state = SessionState::Complete;
            let result = SurveyResult {
                responses: self.records.clone(),
                completed_at: chrono::Utc::now(),
            };
            self.result = Some(result.clone());
            tracing::info!("Survey complete with {} answers", self.records.len());
            Some(result)
        } else {
            None
        };

        Ok(Submission {
            record,
            completed,
            result,
        })
    }
}

impl Default for SurveySession {
    fn default() -> Self {
        Self::new()
    }
}

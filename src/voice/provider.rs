use thiserror::Error;

use crate::models::AudioClip;

/// Errors from the transcription paths. Local and remote failures are kept
/// distinct so the coordinator can decide which ones to fall back from.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("speech recognition is not supported on this host")]
    NotSupported,

    #[error("recognition failed: {0}")]
    Recognition(String),

    #[error("remote voice service is not configured")]
    Configuration,

    #[error("could not reach remote voice service: {0}")]
    Connectivity(String),

    #[error("remote voice service returned status {0}")]
    Service(u16),

    #[error("no transcript within {0} seconds")]
    Timeout(u64),

    #[error("no transcription path produced a transcript")]
    NoTranscript,

    #[error("result belongs to superseded cycle {0}")]
    Stale(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    Local,
    Remote,
}

impl TranscriptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptSource::Local => "local",
            TranscriptSource::Remote => "remote",
        }
    }
}

/// A finished transcript together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub source: TranscriptSource,
}

impl Transcript {
    pub fn local(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: TranscriptSource::Local,
        }
    }

    pub fn remote(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: TranscriptSource::Remote,
        }
    }
}

/// Input handed to a transcription path.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptionRequest<'a> {
    /// Finished audio artifact. Absent for live-stream paths that listen
    /// alongside capture instead of consuming the clip.
    pub clip: Option<&'a AudioClip>,
    /// Free-text hint describing what the speaker was asked, forwarded to
    /// providers that accept context.
    pub context: &'a str,
}

/// One way of turning speech into text. The coordinator composes these;
/// implementations never fall back between themselves.
pub trait TranscriptionProvider {
    async fn transcribe(
        &mut self,
        request: TranscriptionRequest<'_>,
    ) -> Result<Transcript, TranscriptionError>;
}

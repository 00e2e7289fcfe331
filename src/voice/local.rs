use crate::voice::provider::{
    Transcript, TranscriptionError, TranscriptionProvider, TranscriptionRequest,
};

/// Host speech-recognition capability. Listens to the live microphone while
/// capture runs, so it never consumes the buffered clip.
pub trait SpeechRecognizer {
    /// Whether this host exposes a recognition engine at all.
    fn is_supported(&self) -> bool;

    /// Recognize one utterance. Resolves when the engine finalizes its
    /// hypothesis; may outlast capture, which is why the coordinator races
    /// it against a deadline.
    async fn recognize(&mut self) -> Result<String, TranscriptionError>;
}

/// Local transcription path over a host recognizer.
pub struct LocalRecognizer<R> {
    inner: R,
}

impl<R: SpeechRecognizer> LocalRecognizer<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn is_supported(&self) -> bool {
        self.inner.is_supported()
    }
}

impl<R: SpeechRecognizer> TranscriptionProvider for LocalRecognizer<R> {
    async fn transcribe(
        &mut self,
        _request: TranscriptionRequest<'_>,
    ) -> Result<Transcript, TranscriptionError> {
        if !self.inner.is_supported() {
            return Err(TranscriptionError::NotSupported);
        }

        let text = self.inner.recognize().await?;
        if text.trim().is_empty() {
            return Err(TranscriptionError::Recognition(
                "empty recognition hypothesis".to_string(),
            ));
        }
        Ok(Transcript::local(text))
    }
}

/// Host without a recognition engine. The server intake path runs with this
/// recognizer, leaving transcription to the caller's transcript or to the
/// remote service.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    async fn recognize(&mut self) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::NotSupported)
    }
}

/// Scripted recognizer for tests: resolves to a fixed outcome, fails, or
/// hangs forever to exercise the deadline path.
#[derive(Debug, Clone)]
pub struct ScriptedRecognizer {
    script: Script,
}

#[derive(Debug, Clone)]
enum Script {
    Text(String),
    Delayed(String, std::time::Duration),
    Fail(String),
    Hang,
}

impl ScriptedRecognizer {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            script: Script::Text(text.into()),
        }
    }

    pub fn ok_after(text: impl Into<String>, delay: std::time::Duration) -> Self {
        Self {
            script: Script::Delayed(text.into(), delay),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Script::Fail(message.into()),
        }
    }

    pub fn hanging() -> Self {
        Self {
            script: Script::Hang,
        }
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    async fn recognize(&mut self) -> Result<String, TranscriptionError> {
        match self.script.clone() {
            Script::Text(text) => Ok(text),
            Script::Delayed(text, delay) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Script::Fail(message) => Err(TranscriptionError::Recognition(message)),
            Script::Hang => std::future::pending().await,
        }
    }
}

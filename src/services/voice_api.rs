use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::VoiceSettings;
use crate::models::AudioClip;
use crate::voice::{
    Transcript, TranscriptionError, TranscriptionProvider, TranscriptionRequest,
};

/// Remote voice-processing API client
///
/// Speaks the hosted transcription service's contract: audio is shipped as
/// base64 with its container format and a free-text question context, the
/// service answers with a transcript or a structured error.
#[derive(Debug, Clone)]
pub struct RemoteVoiceService {
    endpoint: String,
    api_key: String,
    language: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ProcessAudioBody<'a> {
    audio: String,
    format: &'a str,
    context: &'a str,
    language: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProcessAudioReply {
    success: bool,
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RemoteVoiceService {
    pub fn new(endpoint: String, api_key: String, language: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            language,
            client,
        }
    }

    /// Build the client from settings. None when no credential is
    /// configured, which disables the remote path entirely.
    pub fn from_settings(settings: &VoiceSettings) -> Option<Self> {
        settings.api_key.as_ref().map(|key| {
            Self::new(
                settings.endpoint.clone(),
                key.clone(),
                settings.language.clone(),
            )
        })
    }

    /// Submit a finished clip for transcription.
    pub async fn process_audio(
        &self,
        clip: &AudioClip,
        context: &str,
    ) -> Result<String, TranscriptionError> {
        let url = format!("{}/audio/process", self.endpoint);
        let body = ProcessAudioBody {
            audio: base64::engine::general_purpose::STANDARD.encode(&clip.bytes),
            format: &clip.format,
            context,
            language: &self.language,
        };

        tracing::debug!("Submitting {} byte clip to {}", clip.len(), url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptionError::Connectivity(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptionError::Service(status.as_u16()));
        }

        let reply: ProcessAudioReply = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Connectivity(e.to_string()))?;

        if !reply.success {
            return Err(TranscriptionError::Recognition(
                reply.error.unwrap_or_else(|| "unspecified service error".to_string()),
            ));
        }

        match reply.transcript {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(TranscriptionError::NoTranscript),
        }
    }

    /// Probe the service's health endpoint.
    pub async fn test_connection(&self) -> bool {
        let url = format!("{}/health", self.endpoint);
        match self.client.get(&url).bearer_auth(&self.api_key).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Voice service health probe failed: {}", e);
                false
            }
        }
    }
}

impl TranscriptionProvider for RemoteVoiceService {
    async fn transcribe(
        &mut self,
        request: TranscriptionRequest<'_>,
    ) -> Result<Transcript, TranscriptionError> {
        let clip = request.clip.ok_or(TranscriptionError::NoTranscript)?;
        let text = self.process_audio(clip, request.context).await?;
        Ok(Transcript::remote(text))
    }
}

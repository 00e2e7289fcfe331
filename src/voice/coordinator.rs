use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

use crate::models::AudioClip;
use crate::services::voice_api::RemoteVoiceService;
use crate::voice::capture::{AudioCaptureSession, CaptureError, MicrophoneDevice};
use crate::voice::local::{LocalRecognizer, SpeechRecognizer};
use crate::voice::provider::{
    Transcript, TranscriptionError, TranscriptionProvider, TranscriptionRequest,
};

/// Errors from one voice question cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// What a completed cycle yields: the transcript that won, plus the buffered
/// clip when capture produced one.
#[derive(Debug)]
pub struct CycleOutcome {
    pub transcript: Transcript,
    pub clip: Option<AudioClip>,
}

/// Drives one question's voice cycle: capture with local recognition raced
/// against a deadline, then the buffered clip to the remote service when one
/// is configured. A successful remote transcript overrides the local
/// hypothesis.
///
/// Each cycle gets a fresh id from a monotonic counter; a result is dropped
/// as stale if a newer cycle (or an abort) superseded it while the result
/// was still in flight.
pub struct TranscriptionCoordinator {
    remote: Option<RemoteVoiceService>,
    max_wait: Duration,
    cycle: AtomicU64,
}

impl TranscriptionCoordinator {
    pub fn new(remote: Option<RemoteVoiceService>, max_wait: Duration) -> Self {
        Self {
            remote,
            max_wait,
            cycle: AtomicU64::new(0),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Invalidate any in-flight cycle. Its eventual result is discarded as
    /// stale instead of being delivered.
    pub fn abort(&self) {
        self.cycle.fetch_add(1, Ordering::SeqCst);
    }

    /// Run one full question cycle.
    ///
    /// The device is owned by the cycle: whichever way the cycle exits,
    /// including cancellation by dropping this future, the capture session's
    /// drop releases it.
    pub async fn run_cycle<D, R>(
        &self,
        device: D,
        mut local: LocalRecognizer<R>,
        format: &str,
        context: &str,
    ) -> Result<CycleOutcome, CycleError>
    where
        D: MicrophoneDevice,
        R: SpeechRecognizer,
    {
        let cycle_id = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Starting voice cycle {}", cycle_id);

        let mut session = AudioCaptureSession::new(device, format);
        session.request_permission().await?;
        session.start().await?;

        // Local recognition listens alongside capture; both run until the
        // stream ends or the recognition deadline fires.
        let deadline = self.max_wait;
        let local_task = async {
            let request = TranscriptionRequest {
                clip: None,
                context,
            };
            match tokio::time::timeout(deadline, local.transcribe(request)).await {
                Ok(result) => result,
                Err(_) => Err(TranscriptionError::Timeout(deadline.as_secs())),
            }
        };
        let (local_result, buffered) = tokio::join!(local_task, session.buffer_until_end());
        buffered?;

        let clip = session.stop()?;
        self.ensure_fresh(cycle_id)?;

        // The remote service is engaged whenever it is configured and a
        // non-empty artifact exists, even when local recognition succeeded:
        // its transcript is treated as higher-confidence.
        let remote_result = match (&self.remote, clip.as_ref()) {
            (Some(_), Some(clip)) => Some(self.call_remote(clip, context).await),
            _ => None,
        };

        // A newer cycle may have started while the remote call ran.
        self.ensure_fresh(cycle_id)?;

        let transcript = match (remote_result, local_result) {
            (Some(Ok(remote)), _) => remote,
            (Some(Err(remote_err)), Ok(local)) => {
                tracing::warn!(
                    "Remote transcription failed ({}), keeping local hypothesis",
                    remote_err
                );
                local
            }
            (None, Ok(local)) => local,
            (Some(Err(remote_err)), Err(local_err)) => {
                tracing::debug!(
                    "Both transcription paths failed in cycle {}: local {}, remote {}",
                    cycle_id,
                    local_err,
                    remote_err
                );
                // A local deadline is the more truthful story than whatever
                // the remote path tripped over afterwards.
                if matches!(local_err, TranscriptionError::Timeout(_)) {
                    return Err(local_err.into());
                }
                return Err(remote_err.into());
            }
            (None, Err(local_err)) => {
                if self.remote.is_some() && clip.is_none() {
                    return Err(TranscriptionError::NoTranscript.into());
                }
                return Err(local_err.into());
            }
        };

        tracing::info!(
            "Voice cycle {} resolved via {} path",
            cycle_id,
            transcript.source.as_str()
        );
        Ok(CycleOutcome { transcript, clip })
    }

    async fn call_remote(
        &self,
        clip: &AudioClip,
        context: &str,
    ) -> Result<Transcript, TranscriptionError> {
        let mut remote = self
            .remote
            .clone()
            .ok_or(TranscriptionError::Configuration)?;
        let request = TranscriptionRequest {
            clip: Some(clip),
            context,
        };
        remote.transcribe(request).await
    }

    fn ensure_fresh(&self, cycle_id: u64) -> Result<(), TranscriptionError> {
        let current = self.cycle.load(Ordering::SeqCst);
        if current != cycle_id {
            tracing::debug!(
                "Dropping stale result from cycle {} (current {})",
                cycle_id,
                current
            );
            return Err(TranscriptionError::Stale(cycle_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::capture::ClipDevice;
    use crate::voice::local::{ScriptedRecognizer, UnsupportedRecognizer};
    use crate::voice::provider::TranscriptSource;
    use std::sync::Arc;

    fn coordinator(max_wait: Duration) -> TranscriptionCoordinator {
        TranscriptionCoordinator::new(None, max_wait)
    }

    #[tokio::test]
    async fn test_local_path_wins_and_clip_is_kept() {
        let c = coordinator(Duration::from_secs(5));
        let device = ClipDevice::new(vec![1u8; 2048]);

        let outcome = c
            .run_cycle(
                device,
                LocalRecognizer::new(ScriptedRecognizer::ok("I go to bed at 11pm")),
                "webm",
                "sleep question",
            )
            .await
            .unwrap();

        assert_eq!(outcome.transcript.text, "I go to bed at 11pm");
        assert_eq!(outcome.transcript.source, TranscriptSource::Local);
        assert_eq!(outcome.clip.unwrap().len(), 2048);
    }

    #[tokio::test]
    async fn test_permission_denied_aborts_cycle() {
        let c = coordinator(Duration::from_secs(5));
        let device = ClipDevice::denied();
        let releases = device.release_count();

        let err = c
            .run_cycle(
                device,
                LocalRecognizer::new(ScriptedRecognizer::ok("unused")),
                "webm",
                "q",
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CycleError::Capture(CaptureError::PermissionDenied)
        ));
        // Device was never acquired, so nothing to release.
        assert_eq!(releases.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_hanging_recognizer_times_out_without_remote() {
        let c = coordinator(Duration::from_millis(20));
        let device = ClipDevice::new(vec![1u8; 512]);

        let err = c
            .run_cycle(
                device,
                LocalRecognizer::new(ScriptedRecognizer::hanging()),
                "webm",
                "q",
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CycleError::Transcription(TranscriptionError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_host_without_remote_fails() {
        let c = coordinator(Duration::from_secs(5));
        let device = ClipDevice::new(vec![1u8; 512]);

        let err = c
            .run_cycle(
                device,
                LocalRecognizer::new(UnsupportedRecognizer),
                "webm",
                "q",
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CycleError::Transcription(TranscriptionError::NotSupported)
        ));
    }

    #[tokio::test]
    async fn test_empty_capture_without_remote_yields_no_clip() {
        let c = coordinator(Duration::from_secs(5));
        let device = ClipDevice::new(Vec::new());

        let outcome = c
            .run_cycle(
                device,
                LocalRecognizer::new(ScriptedRecognizer::ok("spoken anyway")),
                "webm",
                "q",
            )
            .await
            .unwrap();

        assert!(outcome.clip.is_none());
        assert_eq!(outcome.transcript.text, "spoken anyway");
    }

    #[tokio::test]
    async fn test_abort_marks_inflight_cycle_stale() {
        let c = Arc::new(coordinator(Duration::from_secs(5)));
        let device = ClipDevice::new(vec![1u8; 512]);

        let runner = {
            let c = Arc::clone(&c);
            tokio::spawn(async move {
                c.run_cycle(
                    device,
                    LocalRecognizer::new(ScriptedRecognizer::ok_after(
                        "late answer",
                        Duration::from_millis(50),
                    )),
                    "webm",
                    "q",
                )
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        c.abort();

        let err = runner.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            CycleError::Transcription(TranscriptionError::Stale(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_cycle_releases_device() {
        let c = Arc::new(coordinator(Duration::from_secs(5)));
        let device = ClipDevice::new(vec![1u8; 512]);
        let releases = device.release_count();

        let runner = {
            let c = Arc::clone(&c);
            tokio::spawn(async move {
                c.run_cycle(
                    device,
                    LocalRecognizer::new(ScriptedRecognizer::hanging()),
                    "webm",
                    "q",
                )
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        runner.abort();
        let _ = runner.await;

        assert_eq!(releases.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}

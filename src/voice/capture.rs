use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::AudioClip;

/// Maximum buffered audio per question cycle (10 MiB). Prevents OOM from
/// oversized or runaway capture streams.
pub const MAX_CLIP_BYTES: usize = 10 * 1024 * 1024;

/// Errors from the capture lifecycle. Permission denial is terminal for the
/// cycle; device failures are retryable by re-invoking start.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("capture device unavailable: {0}")]
    Unavailable(String),

    #[error("{operation} is not valid in capture state {actual:?}")]
    InvalidState {
        operation: &'static str,
        actual: RecordingState,
    },

    #[error("buffered audio exceeds {MAX_CLIP_BYTES} bytes")]
    ClipTooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Unrequested,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    PermissionRequested,
    Granted,
    Denied,
    Recording,
    Stopped,
}

/// Host microphone capability consumed by the capture session.
///
/// `release` must be idempotent; the session guarantees it is invoked
/// exactly once per acquisition on every exit path.
pub trait MicrophoneDevice {
    async fn request_permission(&mut self) -> Result<PermissionState, CaptureError>;

    /// Open the capture stream. The stream ends when the host stops
    /// delivering chunks (sender dropped).
    async fn start_capture(&mut self) -> Result<mpsc::UnboundedReceiver<Vec<u8>>, CaptureError>;

    fn release(&mut self);
}

/// Owns microphone permission state and raw audio buffering for one
/// question at a time.
///
/// State machine: Idle -> PermissionRequested -> (Granted | Denied) ->
/// Recording -> Stopped -> Idle. Exactly one audio artifact (or none, when
/// nothing was buffered) is emitted per Recording -> Stopped transition.
#[derive(Debug)]
pub struct AudioCaptureSession<D: MicrophoneDevice> {
    device: D,
    state: RecordingState,
    permission: PermissionState,
    started_at: Option<Instant>,
    stream: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
    chunks: Vec<Vec<u8>>,
    buffered_bytes: usize,
    format: String,
    device_held: bool,
}

impl<D: MicrophoneDevice> AudioCaptureSession<D> {
    pub fn new(device: D, format: impl Into<String>) -> Self {
        Self {
            device,
            state: RecordingState::Idle,
            permission: PermissionState::Unrequested,
            started_at: None,
            stream: None,
            chunks: Vec::new(),
            buffered_bytes: 0,
            format: format.into(),
            device_held: false,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Ask the host for microphone access.
    ///
    /// Denial is terminal for this cycle and is never retried here; the
    /// caller decides whether to begin a new cycle.
    pub async fn request_permission(&mut self) -> Result<(), CaptureError> {
        if self.state != RecordingState::Idle {
            return Err(CaptureError::InvalidState {
                operation: "request_permission",
                actual: self.state,
            });
        }

        self.state = RecordingState::PermissionRequested;
        match self.device.request_permission().await? {
            PermissionState::Granted => {
                self.permission = PermissionState::Granted;
                self.state = RecordingState::Granted;
                Ok(())
            }
            _ => {
                self.permission = PermissionState::Denied;
                self.state = RecordingState::Denied;
                tracing::warn!("Microphone permission denied");
                Err(CaptureError::PermissionDenied)
            }
        }
    }

    /// Open the capture stream and begin buffering.
    ///
    /// Valid only from Granted or Stopped. On device failure the session
    /// stays in its prior state so the caller can retry.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.state != RecordingState::Granted && self.state != RecordingState::Stopped {
            return Err(CaptureError::InvalidState {
                operation: "start",
                actual: self.state,
            });
        }

        let stream = self.device.start_capture().await?;
        self.stream = Some(stream);
        self.chunks.clear();
        self.buffered_bytes = 0;
        self.started_at = Some(Instant::now());
        self.device_held = true;
        self.state = RecordingState::Recording;
        Ok(())
    }

    /// Buffer chunks until the capture stream ends.
    ///
    /// On overflow the session releases the device and resets to Idle; the
    /// partial buffer is discarded.
    pub async fn buffer_until_end(&mut self) -> Result<(), CaptureError> {
        if self.state != RecordingState::Recording {
            return Err(CaptureError::InvalidState {
                operation: "buffer_until_end",
                actual: self.state,
            });
        }

        let mut stream = self.stream.take().expect("recording without a stream");
        while let Some(chunk) = stream.recv().await {
            self.buffered_bytes += chunk.len();
            if self.buffered_bytes > MAX_CLIP_BYTES {
                self.abort();
                return Err(CaptureError::ClipTooLarge);
            }
            self.chunks.push(chunk);
        }
        Ok(())
    }

    /// Flush buffered chunks into a single artifact and release the device.
    ///
    /// Valid only from Recording. Returns None when nothing was buffered.
    pub fn stop(&mut self) -> Result<Option<AudioClip>, CaptureError> {
        if self.state != RecordingState::Recording {
            return Err(CaptureError::InvalidState {
                operation: "stop",
                actual: self.state,
            });
        }

        let clip = if self.buffered_bytes == 0 {
            None
        } else {
            let bytes = self.chunks.drain(..).flatten().collect::<Vec<u8>>();
            Some(AudioClip::new(bytes, self.format.clone()))
        };

        if let Some(started) = self.started_at.take() {
            tracing::debug!(
                "Capture stopped after {:?}, {} bytes buffered",
                started.elapsed(),
                self.buffered_bytes
            );
        }

        self.buffered_bytes = 0;
        self.chunks.clear();
        self.release_device();
        self.state = RecordingState::Stopped;
        Ok(clip)
    }

    /// Abandon the cycle: release the device, discard buffered audio,
    /// return to Idle.
    pub fn abort(&mut self) {
        self.stream = None;
        self.chunks.clear();
        self.buffered_bytes = 0;
        self.started_at = None;
        self.release_device();
        self.state = RecordingState::Idle;
    }

    fn release_device(&mut self) {
        if self.device_held {
            self.device.release();
            self.device_held = false;
        }
    }
}

impl<D: MicrophoneDevice> Drop for AudioCaptureSession<D> {
    // Scoped acquisition: cancellation drops the session mid-recording and
    // the device still gets released exactly once.
    fn drop(&mut self) {
        self.release_device();
    }
}

/// Microphone device backed by an already-captured clip.
///
/// Replays uploaded audio through the capture state machine so the HTTP
/// intake path exercises the same lifecycle as a live microphone. Scripted
/// constructors cover the denied/busy host behaviors for tests.
#[derive(Debug)]
pub struct ClipDevice {
    bytes: Vec<u8>,
    chunk_size: usize,
    deny_permission: bool,
    busy: bool,
    release_count: Arc<AtomicUsize>,
}

impl ClipDevice {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            chunk_size: 4096,
            deny_permission: false,
            busy: false,
            release_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Host that refuses microphone access.
    pub fn denied() -> Self {
        Self {
            deny_permission: true,
            ..Self::new(Vec::new())
        }
    }

    /// Host whose capture device is already in use.
    pub fn busy() -> Self {
        Self {
            busy: true,
            ..Self::new(Vec::new())
        }
    }

    /// Shared counter of release calls, for asserting scoped acquisition.
    pub fn release_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.release_count)
    }
}

impl MicrophoneDevice for ClipDevice {
    async fn request_permission(&mut self) -> Result<PermissionState, CaptureError> {
        if self.deny_permission {
            Ok(PermissionState::Denied)
        } else {
            Ok(PermissionState::Granted)
        }
    }

    async fn start_capture(&mut self) -> Result<mpsc::UnboundedReceiver<Vec<u8>>, CaptureError> {
        if self.busy {
            return Err(CaptureError::Unavailable("device busy".to_string()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        for chunk in self.bytes.chunks(self.chunk_size.max(1)) {
            // Receiver outlives this loop; send only fails if it was dropped.
            let _ = tx.send(chunk.to_vec());
        }
        Ok(rx)
    }

    fn release(&mut self) {
        self.release_count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_cycle_emits_one_artifact() {
        let device = ClipDevice::new(vec![7u8; 10_000]);
        let releases = device.release_count();
        let mut session = AudioCaptureSession::new(device, "webm");

        session.request_permission().await.unwrap();
        assert_eq!(session.state(), RecordingState::Granted);

        session.start().await.unwrap();
        assert_eq!(session.state(), RecordingState::Recording);

        session.buffer_until_end().await.unwrap();
        let clip = session.stop().unwrap().unwrap();

        assert_eq!(clip.len(), 10_000);
        assert_eq!(clip.format, "webm");
        assert_eq!(session.state(), RecordingState::Stopped);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_capture_emits_no_artifact() {
        let mut session = AudioCaptureSession::new(ClipDevice::new(Vec::new()), "webm");
        session.request_permission().await.unwrap();
        session.start().await.unwrap();
        session.buffer_until_end().await.unwrap();
        assert!(session.stop().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_denied_permission_is_terminal() {
        let mut session = AudioCaptureSession::new(ClipDevice::denied(), "webm");

        let err = session.request_permission().await.unwrap_err();
        assert!(matches!(err, CaptureError::PermissionDenied));
        assert_eq!(session.state(), RecordingState::Denied);
        assert_eq!(session.permission(), PermissionState::Denied);

        // start() is unreachable from Denied.
        let err = session.start().await.unwrap_err();
        assert!(matches!(err, CaptureError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_busy_device_fails_start_and_stays_granted() {
        let mut session = AudioCaptureSession::new(ClipDevice::busy(), "webm");
        session.request_permission().await.unwrap();

        let err = session.start().await.unwrap_err();
        assert!(matches!(err, CaptureError::Unavailable(_)));
        assert_eq!(session.state(), RecordingState::Granted);
    }

    #[tokio::test]
    async fn test_stop_invalid_before_recording() {
        let mut session = AudioCaptureSession::new(ClipDevice::new(vec![1, 2, 3]), "webm");
        assert!(matches!(
            session.stop(),
            Err(CaptureError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_drop_mid_recording_releases_device_once() {
        let device = ClipDevice::new(vec![1u8; 100]);
        let releases = device.release_count();
        {
            let mut session = AudioCaptureSession::new(device, "webm");
            session.request_permission().await.unwrap();
            session.start().await.unwrap();
            // Dropped while Recording.
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abort_then_drop_releases_exactly_once() {
        let device = ClipDevice::new(vec![1u8; 100]);
        let releases = device.release_count();
        let mut session = AudioCaptureSession::new(device, "webm");
        session.request_permission().await.unwrap();
        session.start().await.unwrap();
        session.abort();
        assert_eq!(session.state(), RecordingState::Idle);
        drop(session);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_oversized_stream_rejected() {
        let mut session =
            AudioCaptureSession::new(ClipDevice::new(vec![0u8; MAX_CLIP_BYTES + 1]), "webm");
        session.request_permission().await.unwrap();
        session.start().await.unwrap();

        let err = session.buffer_until_end().await.unwrap_err();
        assert!(matches!(err, CaptureError::ClipTooLarge));
        assert_eq!(session.state(), RecordingState::Idle);
    }
}

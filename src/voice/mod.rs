// Voice capture and transcription pipeline
pub mod capture;
pub mod coordinator;
pub mod local;
pub mod provider;

pub use capture::{
    AudioCaptureSession, CaptureError, ClipDevice, MicrophoneDevice, PermissionState,
    RecordingState, MAX_CLIP_BYTES,
};
pub use coordinator::{CycleError, CycleOutcome, TranscriptionCoordinator};
pub use local::{LocalRecognizer, ScriptedRecognizer, SpeechRecognizer, UnsupportedRecognizer};
pub use provider::{
    Transcript, TranscriptSource, TranscriptionError, TranscriptionProvider, TranscriptionRequest,
};

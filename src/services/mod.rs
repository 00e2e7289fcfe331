// External integrations and data sources
pub mod pool;
pub mod voice_api;

pub use pool::{CandidateDirectory, PoolError};
pub use voice_api::RemoteVoiceService;

// Route exports
pub mod matches;
pub mod survey;

use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::core::{CompatibilityEngine, SurveySession};
use crate::models::{AdminStatsResponse, HealthResponse};
use crate::services::{CandidateDirectory, RemoteVoiceService};
use crate::voice::TranscriptionCoordinator;

/// One live survey: the question sequencer plus its voice coordinator.
pub struct SurveyEntry {
    pub session: SurveySession,
    pub coordinator: TranscriptionCoordinator,
}

/// Service counters surfaced on the admin dashboard.
#[derive(Debug, Default)]
pub struct ServiceStats {
    sessions_started: AtomicU64,
    surveys_completed: AtomicU64,
    ranking_runs: AtomicU64,
}

impl ServiceStats {
    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_survey_completed(&self) {
        self.surveys_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ranking_run(&self) {
        self.ranking_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sessions_started(&self) -> u64 {
        self.sessions_started.load(Ordering::Relaxed)
    }

    pub fn surveys_completed(&self) -> u64 {
        self.surveys_completed.load(Ordering::Relaxed)
    }

    pub fn ranking_runs(&self) -> u64 {
        self.ranking_runs.load(Ordering::Relaxed)
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<SurveyEntry>>>>>,
    pub engine: CompatibilityEngine,
    pub directory: Arc<CandidateDirectory>,
    pub remote: Option<RemoteVoiceService>,
    pub max_wait: Duration,
    pub stats: Arc<ServiceStats>,
}

impl AppState {
    pub fn new(
        engine: CompatibilityEngine,
        directory: Arc<CandidateDirectory>,
        remote: Option<RemoteVoiceService>,
        max_wait: Duration,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            engine,
            directory,
            remote,
            max_wait,
            stats: Arc::new(ServiceStats::default()),
        }
    }

    /// Register a fresh survey session with its own voice coordinator.
    pub async fn create_session(&self) -> (Uuid, Vec<crate::models::Question>) {
        let session_id = Uuid::new_v4();
        let session = SurveySession::new();
        let questions = session.questions().to_vec();
        let entry = SurveyEntry {
            session,
            coordinator: TranscriptionCoordinator::new(self.remote.clone(), self.max_wait),
        };
        self.sessions
            .write()
            .await
            .insert(session_id, Arc::new(Mutex::new(entry)));
        self.stats.record_session_started();
        (session_id, questions)
    }

    pub async fn session(&self, session_id: &Uuid) -> Option<Arc<Mutex<SurveyEntry>>> {
        self.sessions.read().await.get(session_id).cloned()
    }
}

/// Configure all routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .route("/admin/stats", web::get().to(admin_stats))
            .configure(survey::configure)
            .configure(matches::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let voice = if state.remote.is_some() {
        "configured"
    } else {
        "disabled"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        voice: voice.to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Admin dashboard statistics
///
/// GET /api/v1/admin/stats
async fn admin_stats(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(AdminStatsResponse {
        sessions_started: state.stats.sessions_started(),
        surveys_completed: state.stats.surveys_completed(),
        ranking_runs: state.stats.ranking_runs(),
        pool_size: state.directory.len(),
        rooms_listed: state.directory.rooms_listed(),
    })
}

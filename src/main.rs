mod config;
mod core;
mod models;
mod routes;
mod services;
mod voice;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use models::ScoringWeights;
use routes::AppState;
use services::{CandidateDirectory, RemoteVoiceService};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST),
        )
        .content_type("application/json")
        .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level)),
        )
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Roomie Algo matching service...");
    info!("Configuration loaded successfully");

    // Initialize the candidate pool
    let directory = match &settings.pool.file {
        Some(path) => match CandidateDirectory::load(path) {
            Ok(directory) => directory,
            Err(e) => {
                warn!(
                    "Failed to load candidate pool from {} ({}), using built-in pool",
                    path, e
                );
                CandidateDirectory::seed()
            }
        },
        None => CandidateDirectory::seed(),
    };
    let directory = Arc::new(directory);

    info!(
        "Candidate pool ready: {} candidates, {} rooms",
        directory.len(),
        directory.rooms_listed()
    );

    // Initialize the remote voice path (optional)
    let remote = RemoteVoiceService::from_settings(&settings.voice);
    if remote.is_some() {
        info!("Remote voice service configured at {}", settings.voice.endpoint);
    } else {
        info!("Remote voice service disabled (no credential configured)");
    }

    // Initialize the compatibility engine with configured weights
    let weights = ScoringWeights {
        sleep: settings.scoring.weights.sleep,
        cleanliness: settings.scoring.weights.cleanliness,
        noise: settings.scoring.weights.noise,
        social: settings.scoring.weights.social,
        values: settings.scoring.weights.values,
    };

    let engine = core::CompatibilityEngine::new(weights);

    info!("Compatibility engine initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState::new(
        engine,
        directory,
        remote,
        Duration::from_secs(settings.voice.max_wait_secs),
    );

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

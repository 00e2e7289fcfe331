use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, FindMatchesRequest, FindMatchesResponse};
use crate::routes::AppState;

/// Configure match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches/find", web::post().to(find_matches));
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "sessionId": "uuid",
///   "limit": 20
/// }
/// ```
///
/// Ranks the candidate pool against the session's completed survey.
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let entry = match state.session(&req.session_id).await {
        Some(entry) => entry,
        None => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Session not found".to_string(),
                message: format!("no survey session with id {}", req.session_id),
                status_code: 404,
            });
        }
    };
    let guard = entry.lock().await;

    let result = match guard.session.result() {
        Some(result) => result,
        None => {
            return HttpResponse::Conflict().json(ErrorResponse {
                error: "Survey incomplete".to_string(),
                message: "matches require a completed survey".to_string(),
                status_code: 409,
            });
        }
    };

    let limit = req.limit as usize;
    tracing::info!(
        "Ranking {} candidates for session {}, limit {}",
        state.directory.len(),
        req.session_id,
        limit
    );

    let outcome = state.engine.rank(result, state.directory.candidates(), limit);
    state.stats.record_ranking_run();

    tracing::info!(
        "Returning {} matches for session {} ({} skipped of {} candidates)",
        outcome.matches.len(),
        req.session_id,
        outcome.skipped.len(),
        outcome.total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: outcome.matches,
        skipped: outcome.skipped,
        total_candidates: outcome.total_candidates,
    })
}

use actix_web::{web, HttpResponse, Responder};
use base64::Engine;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{
    ErrorResponse, StartSurveyResponse, SubmitAnswerRequest, SubmitAnswerResponse,
    VoiceTestResponse,
};
use crate::routes::AppState;
use crate::voice::{
    ClipDevice, CycleError, LocalRecognizer, TranscriptionError, UnsupportedRecognizer,
};

/// Configure survey routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/voice/test", web::get().to(voice_test))
        .route("/survey/start", web::post().to(start_survey))
        .route("/survey/answer", web::post().to(submit_answer))
        .route("/survey/result", web::get().to(get_result));
}

/// Probe the remote voice service
///
/// GET /api/v1/voice/test
async fn voice_test(state: web::Data<AppState>) -> impl Responder {
    let (configured, reachable) = match &state.remote {
        Some(remote) => (true, remote.test_connection().await),
        None => (false, false),
    };

    HttpResponse::Ok().json(VoiceTestResponse {
        configured,
        reachable,
    })
}

/// Start a new survey session
///
/// POST /api/v1/survey/start
async fn start_survey(state: web::Data<AppState>) -> impl Responder {
    let (session_id, questions) = state.create_session().await;

    tracing::info!("Started survey session {}", session_id);

    HttpResponse::Ok().json(StartSurveyResponse {
        session_id,
        questions,
    })
}

/// Submit one survey answer
///
/// POST /api/v1/survey/answer
///
/// Request body:
/// ```json
/// {
///   "sessionId": "uuid",
///   "questionIndex": 0,
///   "transcript": "I go to bed around 11pm",
///   "audio": "base64...",
///   "audioFormat": "webm"
/// }
/// ```
///
/// Either `transcript` (used as-is) or `audio` (runs the voice pipeline)
/// must be present.
async fn submit_answer(
    state: web::Data<AppState>,
    req: web::Json<SubmitAnswerRequest>,
) -> impl Responder {
    let entry = match state.session(&req.session_id).await {
        Some(entry) => entry,
        None => return session_not_found(&req.session_id),
    };
    let mut guard = entry.lock().await;
    let entry = &mut *guard;

    // Answers are strictly sequential; reject out-of-order submissions
    // before doing any transcription work.
    let expected = entry.session.current_index();
    if entry.session.is_complete() {
        return HttpResponse::Conflict().json(ErrorResponse {
            error: "Survey complete".to_string(),
            message: "survey session is already complete".to_string(),
            status_code: 409,
        });
    }
    if req.question_index != expected {
        return HttpResponse::Conflict().json(ErrorResponse {
            error: "Question mismatch".to_string(),
            message: format!(
                "answer targets question {} but the current question is {}",
                req.question_index, expected
            ),
            status_code: 409,
        });
    }

    let (transcript, source, clip) = if let Some(text) = req.transcript.clone() {
        (text, "text".to_string(), None)
    } else if let Some(audio) = &req.audio {
        let bytes = match base64::engine::general_purpose::STANDARD.decode(audio) {
            Ok(bytes) => bytes,
            Err(e) => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Invalid audio".to_string(),
                    message: format!("audio is not valid base64: {}", e),
                    status_code: 400,
                });
            }
        };

        let context = entry.session.questions()[expected].text.clone();
        let outcome = entry
            .coordinator
            .run_cycle(
                ClipDevice::new(bytes),
                // The server host has no recognition engine of its own;
                // transcription falls through to the remote service.
                LocalRecognizer::new(UnsupportedRecognizer),
                &req.audio_format,
                &context,
            )
            .await;

        match outcome {
            Ok(outcome) => (
                outcome.transcript.text,
                outcome.transcript.source.as_str().to_string(),
                outcome.clip,
            ),
            Err(e) => return cycle_error_response(e),
        }
    } else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Missing answer".to_string(),
            message: "either transcript or audio must be provided".to_string(),
            status_code: 400,
        });
    };

    let submission = match entry.session.submit_answer(&transcript, clip) {
        Ok(submission) => submission,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid answer".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    if submission.completed {
        state.stats.record_survey_completed();
        tracing::info!("Survey session {} completed", req.session_id);
    }

    HttpResponse::Ok().json(SubmitAnswerResponse {
        question_index: submission.record.question_index,
        transcript: submission.record.raw_transcript.clone(),
        analysis: submission.record.analysis.clone(),
        source,
        completed: submission.completed,
        result: submission.result,
    })
}

#[derive(Debug, Deserialize)]
struct ResultQuery {
    #[serde(alias = "session_id", rename = "sessionId")]
    session_id: Uuid,
}

/// Fetch the frozen result of a completed survey
///
/// GET /api/v1/survey/result?sessionId=...
async fn get_result(state: web::Data<AppState>, query: web::Query<ResultQuery>) -> impl Responder {
    let entry = match state.session(&query.session_id).await {
        Some(entry) => entry,
        None => return session_not_found(&query.session_id),
    };
    let guard = entry.lock().await;

    match guard.session.result() {
        Some(result) => HttpResponse::Ok().json(result),
        None => HttpResponse::Conflict().json(ErrorResponse {
            error: "Survey incomplete".to_string(),
            message: format!(
                "survey has {} of {} answers",
                guard.session.current_index(),
                guard.session.questions().len()
            ),
            status_code: 409,
        }),
    }
}

fn session_not_found(session_id: &Uuid) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Session not found".to_string(),
        message: format!("no survey session with id {}", session_id),
        status_code: 404,
    })
}

fn cycle_error_response(error: CycleError) -> HttpResponse {
    match error {
        CycleError::Capture(e) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Capture failed".to_string(),
            message: e.to_string(),
            status_code: 400,
        }),
        CycleError::Transcription(e) => match e {
            TranscriptionError::Connectivity(_) | TranscriptionError::Service(_) => {
                HttpResponse::BadGateway().json(ErrorResponse {
                    error: "Voice service unavailable".to_string(),
                    message: e.to_string(),
                    status_code: 502,
                })
            }
            TranscriptionError::Stale(_) => HttpResponse::Conflict().json(ErrorResponse {
                error: "Superseded".to_string(),
                message: e.to_string(),
                status_code: 409,
            }),
            _ => HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "Transcription failed".to_string(),
                message: e.to_string(),
                status_code: 422,
            }),
        },
    }
}

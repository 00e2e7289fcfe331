// Integration tests for Roomie Algo

use roomie_algo::core::CompatibilityEngine;
use roomie_algo::services::{CandidateDirectory, RemoteVoiceService};
use roomie_algo::voice::{
    ClipDevice, CycleError, LocalRecognizer, ScriptedRecognizer, TranscriptSource,
    TranscriptionCoordinator, TranscriptionError, UnsupportedRecognizer,
};
use roomie_algo::SurveySession;
use std::time::Duration;

const SURVEY_ANSWERS: [&str; 5] = [
    "I usually go to bed around 11pm and wake up at 7am",
    "I like to keep things very organized and tidy",
    "I prefer a quiet environment for studying",
    "I have friends over occasionally, maybe on weekends",
    "Trust and respect are the most important things to me",
];

fn completed_survey() -> SurveySession {
    let mut session = SurveySession::new();
    for answer in SURVEY_ANSWERS {
        session.submit_answer(answer, None).unwrap();
    }
    assert!(session.is_complete());
    session
}

#[test]
fn test_integration_survey_to_ranked_matches() {
    let session = completed_survey();
    let result = session.result().unwrap();

    // Every answer got a categorized tag in question order.
    assert_eq!(result.responses.len(), 5);
    for (i, record) in result.responses.iter().enumerate() {
        assert_eq!(record.question_index, i);
        assert!(record.analysis.category.is_some());
    }

    let pool = CandidateDirectory::seed();
    let engine = CompatibilityEngine::with_default_weights();
    let outcome = engine.rank(result, pool.candidates(), 20);

    assert_eq!(outcome.total_candidates, 4);
    assert_eq!(outcome.matches.len(), 4);
    assert!(outcome.skipped.is_empty());

    // An early-bird, tidy, quiet, moderately social answerer lines up with
    // Emma's profile exactly.
    assert_eq!(outcome.matches[0].candidate_id, "cand-emma");
    assert_eq!(outcome.matches[0].compatibility_score, 100);
    assert_eq!(outcome.matches[1].candidate_id, "cand-jessica");

    // Scores are monotonically non-increasing down the list.
    for pair in outcome.matches.windows(2) {
        assert!(pair[0].compatibility_score >= pair[1].compatibility_score);
    }

    // Every match carries its room offer and at least one reason.
    for m in &outcome.matches {
        assert!(!m.room.number.is_empty());
        assert!(m.room.rent > 0);
        assert!(!m.match_reasons.is_empty());
    }
}

#[test]
fn test_integration_incomplete_survey_has_no_result() {
    let mut session = SurveySession::new();
    session.submit_answer(SURVEY_ANSWERS[0], None).unwrap();
    session.submit_answer(SURVEY_ANSWERS[1], None).unwrap();

    assert!(!session.is_complete());
    assert!(session.result().is_none());
    assert_eq!(session.current_index(), 2);
}

#[test]
fn test_integration_ranking_is_reproducible() {
    let session = completed_survey();
    let result = session.result().unwrap();
    let pool = CandidateDirectory::seed();
    let engine = CompatibilityEngine::with_default_weights();

    let first = engine.rank(result, pool.candidates(), 20);
    let second = engine.rank(result, pool.candidates(), 20);

    for (a, b) in first.matches.iter().zip(second.matches.iter()) {
        assert_eq!(a.candidate_id, b.candidate_id);
        assert_eq!(a.compatibility_score, b.compatibility_score);
        assert_eq!(a.match_reasons, b.match_reasons);
    }
}

#[tokio::test]
async fn test_integration_remote_transcribes_clip_without_local_engine() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/audio/process")
        .match_header("authorization", "Bearer integration-key")
        .with_status(200)
        .with_body(r#"{"success": true, "transcript": "I go to bed at 11pm"}"#)
        .create_async()
        .await;

    let remote = RemoteVoiceService::new(
        server.url(),
        "integration-key".to_string(),
        "en-US".to_string(),
    );
    let coordinator = TranscriptionCoordinator::new(Some(remote), Duration::from_secs(5));

    // No local recognition engine; the buffered clip carries the answer.
    let outcome = coordinator
        .run_cycle(
            ClipDevice::new(vec![0u8; 4096]),
            LocalRecognizer::new(UnsupportedRecognizer),
            "webm",
            "What time do you usually go to bed and wake up?",
        )
        .await
        .unwrap();

    assert_eq!(outcome.transcript.text, "I go to bed at 11pm");
    assert_eq!(outcome.transcript.source, TranscriptSource::Remote);
    assert!(outcome.clip.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_integration_remote_transcript_overrides_local_hypothesis() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/audio/process")
        .with_status(200)
        .with_body(r#"{"success": true, "transcript": "very tidy and organised"}"#)
        .create_async()
        .await;

    let remote =
        RemoteVoiceService::new(server.url(), "key".to_string(), "en-US".to_string());
    let coordinator = TranscriptionCoordinator::new(Some(remote), Duration::from_secs(5));

    let outcome = coordinator
        .run_cycle(
            ClipDevice::new(vec![0u8; 1024]),
            LocalRecognizer::new(ScriptedRecognizer::ok("fairy tidy and organist")),
            "webm",
            "cleanliness question",
        )
        .await
        .unwrap();

    // The service transcript is treated as higher-confidence than the
    // local hypothesis.
    assert_eq!(outcome.transcript.text, "very tidy and organised");
    assert_eq!(outcome.transcript.source, TranscriptSource::Remote);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_integration_local_hypothesis_stands_when_remote_fails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/audio/process")
        .with_status(500)
        .create_async()
        .await;

    let remote =
        RemoteVoiceService::new(server.url(), "key".to_string(), "en-US".to_string());
    let coordinator = TranscriptionCoordinator::new(Some(remote), Duration::from_secs(5));

    let outcome = coordinator
        .run_cycle(
            ClipDevice::new(vec![0u8; 1024]),
            LocalRecognizer::new(ScriptedRecognizer::ok("very tidy and organized")),
            "webm",
            "cleanliness question",
        )
        .await
        .unwrap();

    assert_eq!(outcome.transcript.text, "very tidy and organized");
    assert_eq!(outcome.transcript.source, TranscriptSource::Local);
}

#[tokio::test]
async fn test_integration_remote_outage_surfaces_service_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/audio/process")
        .with_status(503)
        .create_async()
        .await;

    let remote =
        RemoteVoiceService::new(server.url(), "key".to_string(), "en-US".to_string());
    let coordinator = TranscriptionCoordinator::new(Some(remote), Duration::from_secs(5));

    let err = coordinator
        .run_cycle(
            ClipDevice::new(vec![0u8; 1024]),
            LocalRecognizer::new(UnsupportedRecognizer),
            "webm",
            "q",
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CycleError::Transcription(TranscriptionError::Service(503))
    ));
}

#[tokio::test]
async fn test_integration_transcribed_answer_feeds_the_survey() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/audio/process")
        .with_status(200)
        .with_body(r#"{"success": true, "transcript": "I am a night owl, usually up past midnight"}"#)
        .create_async()
        .await;

    let remote =
        RemoteVoiceService::new(server.url(), "key".to_string(), "en-US".to_string());
    let coordinator = TranscriptionCoordinator::new(Some(remote), Duration::from_secs(5));

    let outcome = coordinator
        .run_cycle(
            ClipDevice::new(vec![0u8; 2048]),
            LocalRecognizer::new(UnsupportedRecognizer),
            "webm",
            "sleep question",
        )
        .await
        .unwrap();

    let mut session = SurveySession::new();
    let submission = session
        .submit_answer(&outcome.transcript.text, outcome.clip)
        .unwrap();

    assert_eq!(submission.record.question_index, 0);
    assert_eq!(submission.record.analysis.label, "night-owl");
    assert!(submission.record.source_audio.is_some());
}

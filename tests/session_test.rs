//! Session state tests: presentation contract and prediction lifecycle

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::StubBackend;
use osiris_core::experiment::ChatRole;
use osiris_core::predict::ClassProbability;
use osiris_core::session::ABANDONED_PREDICTION;
use osiris_core::{
    DashboardConfig, Error, ExperimentId, Page, PredictionClient, PredictionResult,
    PredictionStatus, SessionState, UploadedArtifact,
};

fn session() -> SessionState {
    let config = DashboardConfig::builder()
        .sample_days(30)
        .sample_seed(42)
        .build()
        .unwrap();
    SessionState::new(config)
}

fn artifact(name: &str) -> UploadedArtifact {
    UploadedArtifact::new(name, b"gene,count\nKIT,88\n".to_vec()).unwrap()
}

fn result(message: &str, lt_hsc: f64) -> PredictionResult {
    PredictionResult {
        message: message.to_string(),
        hsc_predictions: vec![ClassProbability::new("LT-HSC", lt_hsc)],
        lineage_predictions: vec![ClassProbability::new("Myeloid", 0.4)],
    }
}

// =============================================================================
// Navigation and experiments
// =============================================================================

#[test]
fn test_create_and_select_navigate_to_dashboard() {
    let mut session = session();
    let a = session.create_experiment("A").unwrap();
    session.navigate(Page::Welcome);
    let b = session.create_experiment("B").unwrap();
    assert_eq!(session.selection().current_experiment_id, Some(b.id()));

    session.navigate(Page::Account);
    session.select_experiment(a.id()).unwrap();

    let selection = session.selection();
    assert_eq!(selection.current_experiment_id, Some(a.id()));
    assert_eq!(selection.current_page, Page::Dashboard);

    let names: Vec<String> = session
        .view()
        .experiments
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_select_unknown_leaves_state_intact() {
    let mut session = session();
    let a = session.create_experiment("A").unwrap();
    session.navigate(Page::Account);

    assert!(matches!(
        session.select_experiment(ExperimentId::new(5)),
        Err(Error::NotFound(_))
    ));
    assert_eq!(session.selection().current_experiment_id, Some(a.id()));
    assert_eq!(session.selection().current_page, Page::Account);
}

#[test]
fn test_blank_experiment_name_rejected() {
    let mut session = session();
    assert!(matches!(
        session.create_experiment("   "),
        Err(Error::Validation(_))
    ));
    assert!(session.view().experiments.is_empty());
    assert_eq!(session.selection().current_page, Page::Welcome);
}

#[test]
fn test_failed_create_keeps_previous_selection() {
    let mut session = session();
    let a = session.create_experiment("A").unwrap();
    session.navigate(Page::Account);

    assert!(session.create_experiment(" ").is_err());

    assert_eq!(session.store().len(), 1);
    assert_eq!(session.selection().current_experiment_id, Some(a.id()));
    assert_eq!(session.selection().current_page, Page::Account);
}

#[test]
fn test_oversized_dataset_rejected_by_config() {
    let config = DashboardConfig::builder().sample_days(200_000_000).build();
    assert!(matches!(config, Err(Error::InvalidConfig(_))));
}

#[test]
fn test_seeded_sessions_share_datasets() {
    let mut a = session();
    let mut b = session();
    a.create_experiment("A").unwrap();
    b.create_experiment("B").unwrap();

    let da = a.view().active.unwrap().dataset;
    let db = b.view().active.unwrap().dataset;
    assert_eq!(da, db);
}

#[test]
fn test_regenerate_replaces_dataset() {
    let mut session = session();
    session.create_experiment("A").unwrap();
    let before = session.view().active.unwrap().dataset;

    session.regenerate_dataset(Some(7)).unwrap();
    let after = session.view().active.unwrap().dataset;

    assert_eq!(after.len(), before.len());
    assert_ne!(after, before);
}

// =============================================================================
// Chat
// =============================================================================

#[test]
fn test_chat_appends_user_and_assistant_messages() {
    let mut session = session();
    session.create_experiment("A").unwrap();

    let reply = session.submit_chat_message("gibberish xyz").unwrap();
    assert_eq!(reply, osiris_core::recommend::FALLBACK_REPLY);

    let chat = session.view().active.unwrap().chat_history;
    let roles: Vec<ChatRole> = chat.iter().map(|m| m.role()).collect();
    assert_eq!(
        roles,
        vec![ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]
    );
    assert_eq!(chat[1].content(), "gibberish xyz");
}

#[test]
fn test_chat_histories_are_per_experiment() {
    let mut session = session();
    let a = session.create_experiment("A").unwrap();
    session.submit_chat_message("Hello").unwrap();
    session.create_experiment("B").unwrap();

    assert_eq!(session.view().active.unwrap().chat_history.len(), 1);
    session.select_experiment(a.id()).unwrap();
    assert_eq!(session.view().active.unwrap().chat_history.len(), 3);
}

// =============================================================================
// Artifacts and predictions
// =============================================================================

#[test]
fn test_upload_requires_active_experiment() {
    let mut session = session();
    assert!(matches!(
        session.upload_artifact(artifact("a.csv")),
        Err(Error::NoActiveExperiment)
    ));
}

#[test]
fn test_upload_and_clear_artifact() {
    let mut session = session();
    session.create_experiment("A").unwrap();
    session.upload_artifact(artifact("counts.tsv")).unwrap();

    let summary = session.view().active.unwrap().artifact.unwrap();
    assert_eq!(summary.file_name, "counts.tsv");
    assert_eq!(summary.size_label, "18 bytes");

    let removed = session.clear_artifact().unwrap();
    assert_eq!(removed.map(|a| a.file_name().to_string()), Some("counts.tsv".to_string()));
    assert!(session.view().active.unwrap().artifact.is_none());
}

#[test]
fn test_second_prediction_rejected_while_in_flight() {
    let mut session = session();
    let id = session.create_experiment("A").unwrap().id();
    session.upload_artifact(artifact("a.csv")).unwrap();

    let ticket = session.begin_prediction().unwrap();
    assert!(session.in_flight().is_in_flight(id));
    assert!(session.view().active.unwrap().prediction_status.is_pending());
    assert!(matches!(
        session.begin_prediction(),
        Err(Error::PredictionInFlight(busy)) if busy == id
    ));

    session.finish_prediction(ticket, Ok(result("done", 0.7))).unwrap();
    assert!(!session.in_flight().is_in_flight(id));
    assert!(session.begin_prediction().is_ok());
}

#[test]
fn test_other_experiments_stay_usable_during_prediction() {
    let mut session = session();
    let a = session.create_experiment("A").unwrap().id();
    session.upload_artifact(artifact("a.csv")).unwrap();
    let ticket = session.begin_prediction().unwrap();

    let b = session.create_experiment("B").unwrap().id();
    session.submit_chat_message("protocol advice?").unwrap();
    session.upload_artifact(artifact("b.csv")).unwrap();
    let other = session.begin_prediction().unwrap();
    assert_eq!(other.experiment_id(), b);

    // result lands on A even though B is active
    session.finish_prediction(ticket, Ok(result("for A", 0.9))).unwrap();
    assert_eq!(session.selection().current_experiment_id, Some(b));
    assert!(session.view().active.unwrap().hsc_predictions.is_empty());

    session.select_experiment(a).unwrap();
    let view = session.view().active.unwrap();
    assert_eq!(view.hsc_predictions, vec![ClassProbability::new("LT-HSC", 0.9)]);
    assert_eq!(
        view.prediction_status,
        PredictionStatus::Succeeded {
            message: "for A".to_string()
        }
    );
    drop(other);
}

#[test]
fn test_dropped_ticket_reports_failure_and_frees_slot() {
    let mut session = session();
    let id = session.create_experiment("A").unwrap().id();
    session.upload_artifact(artifact("a.csv")).unwrap();

    let ticket = session.begin_prediction().unwrap();
    drop(ticket);

    assert!(!session.in_flight().is_in_flight(id));
    assert_eq!(
        session.view().active.unwrap().prediction_status,
        PredictionStatus::Failed {
            message: ABANDONED_PREDICTION.to_string()
        }
    );

    let ticket = session.begin_prediction().unwrap();
    assert!(session.view().active.unwrap().prediction_status.is_pending());
    session.finish_prediction(ticket, Ok(result("retry", 0.6))).unwrap();
    assert!(matches!(
        session.view().active.unwrap().prediction_status,
        PredictionStatus::Succeeded { .. }
    ));
}

#[test]
fn test_failed_prediction_keeps_previous_results() {
    let mut session = session();
    session.create_experiment("A").unwrap();
    session.upload_artifact(artifact("a.csv")).unwrap();

    let ticket = session.begin_prediction().unwrap();
    session.finish_prediction(ticket, Ok(result("first", 0.5))).unwrap();

    let ticket = session.begin_prediction().unwrap();
    let err = session
        .finish_prediction(ticket, Err(Error::Network("connection refused".to_string())))
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));

    let view = session.view().active.unwrap();
    assert_eq!(view.hsc_predictions, vec![ClassProbability::new("LT-HSC", 0.5)]);
    assert!(matches!(
        view.prediction_status,
        PredictionStatus::Failed { ref message } if message.contains("connection refused")
    ));
}

#[tokio::test]
async fn test_upload_and_predict_against_stub() {
    let stub = StubBackend::ok();
    let client = PredictionClient::new(&stub.spawn().await, Duration::from_secs(5)).unwrap();
    let mut session = session();
    session.create_experiment("A").unwrap();

    session
        .upload_and_predict(&client, artifact("day7.csv"))
        .await
        .unwrap();

    let view = session.view().active.unwrap();
    assert_eq!(view.hsc_predictions.len(), 3);
    assert_eq!(view.lineage_predictions[0].class_name, "Myeloid");
    assert!(session.in_flight().is_empty());
    assert_eq!(stub.received().len(), 1);
}

#[tokio::test]
async fn test_upload_and_predict_in_flight_keeps_pending_artifact() {
    let stub = StubBackend::ok();
    let client = PredictionClient::new(&stub.spawn().await, Duration::from_secs(5)).unwrap();
    let mut session = session();
    session.create_experiment("A").unwrap();
    session.upload_artifact(artifact("first.csv")).unwrap();
    let ticket = session.begin_prediction().unwrap();

    let err = session
        .upload_and_predict(&client, artifact("second.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PredictionInFlight(_)));

    let view = session.view().active.unwrap();
    assert_eq!(view.artifact.map(|a| a.file_name), Some("first.csv".to_string()));
    assert!(view.prediction_status.is_pending());
    assert_eq!(ticket.artifact().file_name(), "first.csv");
    assert!(stub.received().is_empty());
}

#[tokio::test]
async fn test_upload_and_predict_server_error_surfaces() {
    let stub = StubBackend::new(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    let client = PredictionClient::new(&stub.spawn().await, Duration::from_secs(5)).unwrap();
    let mut session = session();
    session.create_experiment("A").unwrap();

    let err = session
        .upload_and_predict(&client, artifact("day7.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Server { status: 500, .. }));

    let view = session.view().active.unwrap();
    assert!(view.hsc_predictions.is_empty());
    assert!(view.artifact.is_some());
    assert!(matches!(view.prediction_status, PredictionStatus::Failed { .. }));
}

#[test]
fn test_view_serializes_for_presentation_layer() {
    let mut session = session();
    session.create_experiment("A").unwrap();
    let json = serde_json::to_value(session.view()).unwrap();

    assert_eq!(json["page"], "Dashboard");
    assert_eq!(json["active"]["dataset"].as_array().map(Vec::len), Some(30));
    assert_eq!(json["active"]["prediction_status"]["state"], "idle");
    assert_eq!(json["active"]["chat_history"][0]["role"], "assistant");
}

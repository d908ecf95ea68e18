use std::sync::Arc;

use quiz_core::catalog::QuestionCatalog;
use quiz_core::learning::LearningMode;
use quiz_core::metrics::MetricsConfig;
use quiz_core::time::{fixed_clock, fixed_now};
use services::{LoadOutcome, ProgressError, ProgressService, QuizSession};
use storage::{InMemoryRepository, PersistError, Storage};

fn new_session() -> QuizSession {
    let catalog = QuestionCatalog::builtin().unwrap();
    QuizSession::new(catalog, MetricsConfig::default(), LearningMode::Study, fixed_clock()).unwrap()
}

fn answer_some(session: &mut QuizSession, count: usize) {
    for _ in 0..count {
        let label = session.current_question().unwrap().correct_option().to_string();
        session.submit_answer_timed(&label, 9.5).unwrap();
        session.advance().unwrap();
    }
}

#[tokio::test]
async fn fresh_repository_reports_no_prior_save() {
    let service = ProgressService::from_storage(&Storage::in_memory());
    let mut session = new_session();
    let outcome = service.load_into(&mut session).await.unwrap();
    assert_eq!(outcome, LoadOutcome::NoPriorSave);
    assert_eq!(session.metrics().total_answered(), 0);
}

#[tokio::test]
async fn saved_progress_resumes_in_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let service = ProgressService::from_storage(&Storage::json_file(dir.path().join("quiz_progress.json")));

    let mut first = new_session();
    answer_some(&mut first, 4);
    let saved_at = service.save(&first).await.unwrap();
    assert_eq!(saved_at, fixed_now());

    let mut second = new_session();
    let outcome = service.load_into(&mut second).await.unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Restored {
            saved_at,
            answered: 4
        }
    );
    assert_eq!(second.metrics(), first.metrics());
    assert_eq!(second.history(), first.history());
    assert!(second.achievements().is_unlocked("first_victory"));
    assert_eq!(second.achievements().total_points(), first.achievements().total_points());
}

#[tokio::test]
async fn malformed_save_leaves_session_untouched() {
    let repo = InMemoryRepository::new();
    repo.put_raw("{\"metrics\": {}}").unwrap();
    let service = ProgressService::new(Arc::new(repo));

    let mut session = new_session();
    answer_some(&mut session, 2);
    let before = session.history().to_vec();

    let err = service.load_into(&mut session).await.unwrap_err();
    assert!(matches!(err, ProgressError::Persist(PersistError::Malformed(_))));
    assert_eq!(session.history(), before.as_slice());
}

#[tokio::test]
async fn snapshot_from_another_catalog_is_rejected() {
    let repo = InMemoryRepository::new();
    let service = ProgressService::new(Arc::new(repo.clone()));

    let mut session = new_session();
    answer_some(&mut session, 1);
    service.save(&session).await.unwrap();

    let raw = repo.raw().unwrap().unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    json["history"][0]["question_id"] = serde_json::json!(404);
    repo.put_raw(json.to_string()).unwrap();

    let mut other = new_session();
    let err = service.load_into(&mut other).await.unwrap_err();
    assert!(matches!(err, ProgressError::InvalidInput(_)));
    assert!(other.history().is_empty());
}

#[tokio::test]
async fn report_export_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("session.json");
    let service = ProgressService::from_storage(&Storage::in_memory());

    let mut session = new_session();
    answer_some(&mut session, 3);
    service.export_report(&session, &path).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["answered"], 3);
    assert_eq!(json["session_id"], session.session_id().to_string());
    assert_eq!(json["achievements"][0]["id"], "first_victory");
}

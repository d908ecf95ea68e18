use std::collections::BTreeSet;

use quiz_core::metrics::{MetricsConfig, SessionMetrics};
use quiz_core::model::{AchievementId, AnswerEvent, QuestionId};
use quiz_core::time::fixed_now;
use storage::{JsonFileRepository, PersistError, ProgressRepository, ProgressSnapshot, Storage};

fn build_snapshot() -> ProgressSnapshot {
    let history: Vec<_> = (1..=6)
        .map(|i| {
            AnswerEvent::new(
                QuestionId::new(i),
                i % 3 != 0,
                f64::from(i) * 7.3,
                i == 2,
                i == 4,
                fixed_now(),
            )
        })
        .collect();
    let metrics = SessionMetrics::from_history(&history, &MetricsConfig::default());
    let unlocked: BTreeSet<_> = ["first_victory", "explorer"]
        .into_iter()
        .map(AchievementId::from)
        .collect();
    ProgressSnapshot::new(metrics, history, unlocked, fixed_now())
}

#[tokio::test]
async fn missing_file_is_no_prior_save() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("quiz_progress.json"));
    assert!(repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiz_progress.json");
    let repo = JsonFileRepository::new(&path);

    let snapshot = build_snapshot();
    repo.save(&snapshot).await.unwrap();

    let loaded = repo.load().await.unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.metrics.accuracy(), snapshot.metrics.accuracy());
    assert_eq!(
        loaded.metrics.consistency_score(),
        snapshot.metrics.consistency_score()
    );
}

#[tokio::test]
async fn save_creates_parent_dirs_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("saves").join("progress.json");
    let repo = JsonFileRepository::new(&path);

    repo.save(&build_snapshot()).await.unwrap();

    assert!(path.exists());
    let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["progress.json".to_string()]);
}

#[tokio::test]
async fn second_save_replaces_first() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("p.json"));

    let first = build_snapshot();
    repo.save(&first).await.unwrap();

    let mut second = first.clone();
    second.history.truncate(2);
    second.metrics = SessionMetrics::from_history(&second.history, &MetricsConfig::default());
    second.unlocked_achievement_ids.clear();
    repo.save(&second).await.unwrap();

    assert_eq!(repo.load().await.unwrap(), Some(second));
}

#[tokio::test]
async fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.json");
    std::fs::write(&path, "{\"metrics\": 3").unwrap();

    let err = JsonFileRepository::new(&path).load().await.unwrap_err();
    assert!(matches!(err, PersistError::Malformed(_)));
}

#[tokio::test]
async fn snapshot_missing_metrics_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.json");
    std::fs::write(
        &path,
        r#"{"history": [], "unlocked_achievement_ids": [], "saved_at": "2023-11-14T22:13:20Z"}"#,
    )
    .unwrap();

    let err = JsonFileRepository::new(&path).load().await.unwrap_err();
    assert!(matches!(err, PersistError::Malformed(_)));
}

#[tokio::test]
async fn hand_edited_file_with_extra_keys_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.json");
    let mut json: serde_json::Value =
        serde_json::from_str(&build_snapshot().to_json().unwrap()).unwrap();
    json["player_name"] = serde_json::json!("ada");
    json.as_object_mut().unwrap().remove("history");
    std::fs::write(&path, json.to_string()).unwrap();

    let loaded = JsonFileRepository::new(&path).load().await.unwrap().unwrap();
    assert!(loaded.history.is_empty());
    assert_eq!(loaded.metrics.total_answered(), 6);
}

#[tokio::test]
async fn storage_aggregator_uses_json_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.json");
    let storage = Storage::json_file(&path);

    storage.progress.save(&build_snapshot()).await.unwrap();
    assert!(path.exists());
    assert!(storage.progress.load().await.unwrap().is_some());
}

#[tokio::test]
async fn write_json_atomic_writes_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    storage::write_json_atomic(&path, &serde_json::json!({"score": 3})).await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["score"], 3);
}

use std::fs;

use formtrack_lib::{run_in, Database, EngineError};
use tempfile::tempdir;

fn write_settings(dir: &std::path::Path, json: &str) {
    fs::write(dir.join("settings.json"), json).expect("settings file");
}

#[test]
fn test_run_fails_when_exercise_unset() {
    let dir = tempdir().expect("temp dir");

    let err = run_in(dir.path().to_path_buf()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EngineError>(),
        Some(&EngineError::MissingExerciseMode)
    );
    // Nothing was opened or written.
    assert!(!dir.path().join("formtrack.sqlite3").exists());
}

#[test]
fn test_run_fails_on_unknown_exercise() {
    let dir = tempdir().expect("temp dir");
    write_settings(dir.path(), r#"{ "exercise": "burpees" }"#);

    let err = run_in(dir.path().to_path_buf()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EngineError>(),
        Some(&EngineError::UnknownExerciseMode("burpees".into()))
    );
}

#[test]
fn test_run_fails_on_malformed_settings() {
    let dir = tempdir().expect("temp dir");
    write_settings(dir.path(), "{ not json");

    let err = run_in(dir.path().to_path_buf()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<EngineError>(),
        Some(&EngineError::MissingExerciseMode)
    );
}

#[test]
fn test_run_stores_demo_session() {
    let dir = tempdir().expect("temp dir");
    write_settings(dir.path(), r#"{ "user_id": 12, "exercise": "default" }"#);

    run_in(dir.path().to_path_buf()).expect("demo run");

    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let sessions = runtime.block_on(async {
        let db = Database::new(dir.path().join("formtrack.sqlite3")).expect("database");
        db.list_sessions_for_user(12, 10).await.expect("list")
    });
    assert_eq!(sessions.len(), 1);
}

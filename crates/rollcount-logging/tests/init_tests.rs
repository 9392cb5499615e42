use rollcount_logging::{init_tracing, init_tracing_with_file, LogFormat, StoreEvent};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_second_init_is_a_no_op() {
    // The first call may or may not win depending on the harness; the second never does.
    let _ = init_tracing("debug", LogFormat::Compact);
    assert!(!init_tracing("info", LogFormat::Json));

    let dir = TempDir::new().unwrap();
    assert!(init_tracing_with_file("info", LogFormat::Json, dir.path())
        .unwrap()
        .is_none());

    // Emitting after installation must not panic regardless of level.
    StoreEvent::SnapshotRolledOver {
        path: PathBuf::from("statistics.json"),
        granularity: "day".to_string(),
    }
    .emit();
}

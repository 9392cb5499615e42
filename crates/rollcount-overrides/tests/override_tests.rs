use std::fs;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use rollcount_overrides::OverrideStore;
use tempfile::TempDir;

#[test]
fn test_remove_save_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("override_ids.json");
    fs::write(&path, r#"{"a":"1","b":"2"}"#).unwrap();

    let store = OverrideStore::new(&path);
    assert_eq!(store.load(), 2);
    assert_eq!(store.remove("a"), Some("1".to_string()));
    assert!(store.save());

    let fresh = OverrideStore::new(&path);
    fresh.load();
    let view = fresh.view();
    assert_eq!(view.len(), 1);
    assert_eq!(view.get("b").map(String::as_str), Some("2"));

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, serde_json::json!({"b": "2"}));
}

#[test]
fn test_load_missing_file_gives_empty_map() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("override_ids.json");
    let store = OverrideStore::new(&path);
    store.add("stale", "x");

    assert_eq!(store.load(), 0);
    assert!(store.is_empty());
    assert!(!path.exists());
}

#[test]
fn test_load_empty_file_gives_empty_map() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("override_ids.json");
    fs::write(&path, "").unwrap();

    let store = OverrideStore::new(&path);
    assert_eq!(store.load(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_malformed_file_is_not_rewritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("override_ids.json");
    let garbage = r#"{"a": 1, "b": ["not", "a", "string"]}"#;
    fs::write(&path, garbage).unwrap();

    let store = OverrideStore::new(&path);
    store.add("previous", "value");
    assert_eq!(store.load(), 0);

    assert!(store.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), garbage);
}

#[test]
fn test_save_output_is_sorted_and_stable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("override_ids.json");
    let store = OverrideStore::new(&path);
    store.add("zeta", "26");
    store.add("alpha", "1");
    store.add("mid", "13");
    assert!(store.save());
    let first = fs::read_to_string(&path).unwrap();

    store.load();
    assert!(store.save());
    let second = fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
    assert!(first.find("alpha").unwrap() < first.find("mid").unwrap());
    assert!(first.find("mid").unwrap() < first.find("zeta").unwrap());
}

#[test]
fn test_save_to_unwritable_path_returns_false() {
    let dir = TempDir::new().unwrap();
    let store = OverrideStore::new(dir.path());
    store.add("a", "1");
    assert!(!store.save());
    assert_eq!(store.get("a"), Some("1".to_string()));
}

#[test]
fn test_concurrent_adds_and_reads() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(OverrideStore::new(dir.path().join("override_ids.json")));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    store.add(format!("{}-{}", t, i), i.to_string());
                    let _ = store.get("0-0");
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(store.len(), 400);
    assert!(store.save());

    let reloaded = OverrideStore::new(store.path());
    assert_eq!(reloaded.load(), 400);
    assert_eq!(reloaded.get("3-99"), Some("99".to_string()));
}

#[test]
fn test_readers_proceed_while_view_held_and_writer_runs() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(OverrideStore::new(dir.path().join("override_ids.json")));
    store.add("kept", "1");

    let view = store.view();

    let (done_tx, done_rx) = mpsc::channel();
    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            store.add("added", "2");
            assert!(store.save());
            done_tx.send(()).unwrap();
        })
    };
    done_rx
        .recv_timeout(Duration::from_secs(10))
        .expect("writer finished while a view was held");

    let (read_tx, read_rx) = mpsc::channel();
    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || read_tx.send(store.get("added")).unwrap())
    };
    assert_eq!(
        read_rx.recv_timeout(Duration::from_secs(10)).unwrap(),
        Some("2".to_string())
    );
    assert_eq!(store.get("kept"), Some("1".to_string()));

    assert_eq!(view.len(), 1);
    assert!(view.get("added").is_none());

    writer.join().unwrap();
    reader.join().unwrap();
}

//! Preference persistence end-to-end tests.
//!
//! # Invariants
//!
//! 1. **Round-trip integrity**: a value flushed by one page load is read by the next.
//! 2. **Graceful degradation**: corrupt or unavailable storage yields errors, never panics.
//! 3. **Atomic writes**: no temporary file survives a save.
//! 4. **Concurrent safety**: multiple threads can use one registry.

#![cfg(feature = "state-persistence")]

use std::sync::{Arc, Barrier};
use std::thread;

use folio_runtime::state_persistence::{FileStorage, StateRegistry, StorageBackend, StorageError};

#[test]
fn file_storage_round_trip_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site").join("preferences.json");

    let first = StateRegistry::with_file(&path);
    assert_eq!(first.load().unwrap(), 0);
    first.set("theme", 1, "light");
    assert!(first.flush().unwrap());
    drop(first);

    let second = StateRegistry::with_file(&path);
    assert_eq!(second.load().unwrap(), 1);
    assert_eq!(second.value("theme").as_deref(), Some("light"));
}

#[test]
fn file_format_is_plain_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    let registry = StateRegistry::with_file(&path);
    registry.set("theme", 1, "dark");
    registry.flush().unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["format_version"], 1);
    assert_eq!(json["entries"]["theme"]["value"], "dark");
    assert_eq!(json["entries"]["theme"]["version"], 1);
}

#[test]
fn no_temp_file_left_after_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let storage = FileStorage::new(&path);

    let registry = StateRegistry::new(Box::new(FileStorage::new(&path)));
    registry.set("theme", 1, "light");
    registry.flush().unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
    assert!(storage.is_available());
}

#[test]
fn corrupt_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "{ not json").unwrap();

    let registry = StateRegistry::with_file(&path);
    assert!(matches!(
        registry.load(),
        Err(StorageError::Serialization(_))
    ));
    assert!(registry.is_empty());
}

#[test]
fn unknown_format_version_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(
        &path,
        r#"{"format_version":99,"entries":{"theme":{"version":1,"value":"light"}}}"#,
    )
    .unwrap();

    let registry = StateRegistry::with_file(&path);
    assert_eq!(registry.load().unwrap(), 0);
    assert!(registry.value("theme").is_none());
}

#[test]
fn clear_removes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    let registry = StateRegistry::with_file(&path);
    registry.set("theme", 1, "light");
    registry.flush().unwrap();
    assert!(path.exists());

    registry.clear().unwrap();
    assert!(!path.exists());
}

#[test]
fn concurrent_sets_are_all_visible() {
    let registry = Arc::new(StateRegistry::in_memory());
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for j in 0..25 {
                    registry.set(format!("k{i}-{j}"), 1, format!("{j}"));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(registry.len(), 100);
    assert!(registry.flush().unwrap());
}

//! Construction: file/directory creation, tolerant loading, reload fidelity.

use json_debounce::DebouncedStore;
use std::time::Duration;

const QUIET: Duration = Duration::from_secs(60);

#[test]
fn missing_file_yields_empty_store_and_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = DebouncedStore::open_with_delay(dir.path().join("fresh"), QUIET);
    assert!(db.is_empty());
    assert!(db.path().exists());
}

#[test]
fn parent_directories_are_created_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b").join("c").join("db");
    let db = DebouncedStore::open_with_delay(&nested, QUIET);
    assert!(db.path().exists());
    assert_eq!(db.path(), dir.path().join("a/b/c/db.json"));
}

#[test]
fn corrupt_file_yields_empty_functional_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.json");
    std::fs::write(&path, b"{\"a\": <garbage>").unwrap();

    let db = DebouncedStore::open_with_delay(&path, QUIET);
    assert!(db.is_empty());

    // still fully usable, and a flush repairs the file
    db.set("a", "1");
    db.flush_now().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"a":"1"}"#);
}

#[test]
fn top_level_array_is_treated_as_no_prior_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("array.json");
    std::fs::write(&path, b"[1,2,3]").unwrap();
    let db = DebouncedStore::open_with_delay(&path, QUIET);
    assert!(db.is_empty());
}

#[test]
fn empty_file_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, b"").unwrap();
    let db = DebouncedStore::open_with_delay(&path, QUIET);
    assert!(db.is_empty());
}

#[test]
fn non_string_values_are_coerced_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.json");
    std::fs::write(
        &path,
        br#"{"s":"plain","n":3,"b":true,"z":null,"o":{"x":1}}"#,
    )
    .unwrap();

    let db = DebouncedStore::open_with_delay(&path, QUIET);
    assert_eq!(db.len(), 5);
    assert_eq!(db.get("s").as_deref(), Some("plain"));
    assert_eq!(db.get("n").as_deref(), Some("3"));
    assert_eq!(db.get("b").as_deref(), Some("true"));
    assert_eq!(db.get("z").as_deref(), Some("null"));
    assert_eq!(db.get("o").as_deref(), Some(r#"{"x":1}"#));
}

#[test]
fn persist_and_reload_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip");
    {
        let db = DebouncedStore::open_with_delay(&path, QUIET);
        db.set("k1", "v1");
        db.set("k2", "v2");
        db.flush_now().unwrap();
    }
    let db = DebouncedStore::open_with_delay(&path, QUIET);
    assert_eq!(db.get("k1").as_deref(), Some("v1"));
    assert_eq!(db.get("k2").as_deref(), Some("v2"));
    assert!(!db.has_pending_flush());
}

#[test]
fn no_timer_armed_by_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calm.json");
    std::fs::write(&path, br#"{"a":"1"}"#).unwrap();
    let db = DebouncedStore::open_with_delay(&path, Duration::from_millis(20));
    std::thread::sleep(Duration::from_millis(100));
    // loading alone never rewrites the file
    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"a":"1"}"#);
    assert!(!db.has_pending_flush());
}

#[test]
fn unusable_path_still_yields_functional_store() {
    let dir = tempfile::tempdir().unwrap();
    // a directory squatting on the backing path blocks both load and flush
    let path = dir.path().join("squatted.json");
    std::fs::create_dir(&path).unwrap();

    let db = DebouncedStore::open_with_delay(&path, QUIET);
    assert!(db.is_empty());
    db.set("a", "1");
    assert_eq!(db.get("a").as_deref(), Some("1"));
    assert!(db.flush_now().is_err());
}

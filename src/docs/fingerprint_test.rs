use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_store_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = FingerprintStore::new(temp_dir.path().join("fingerprints.json"));

    assert!(store.load().is_empty());
    assert!(matches!(
        store.try_load().unwrap_err(),
        RegistryError::StoreUnavailable { .. }
    ));
}

#[test]
fn test_corrupted_store_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fingerprints.json");
    fs::write(&path, "{ this is not json").unwrap();

    let store = FingerprintStore::new(&path);

    assert!(store.load().is_empty());
    let err = store.try_load().unwrap_err().to_string();
    assert!(err.contains("corrupted"), "got: {}", err);
}

#[test]
fn test_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let store = FingerprintStore::new(temp_dir.path().join("state/fingerprints.json"));

    let mut map = FingerprintMap::new();
    map.insert("docs/a.md".to_string(), FingerprintStore::compute(b"a"));
    map.insert("docs/b.md".to_string(), FingerprintStore::compute(b"b"));

    store.save(&map).unwrap();

    assert_eq!(store.load(), map);
}

#[test]
fn test_store_file_is_plain_json_object() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fingerprints.json");
    let store = FingerprintStore::new(&path);

    let mut map = FingerprintMap::new();
    map.insert("a.md".to_string(), FingerprintStore::compute(b"hello"));
    store.save(&map).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!({ "a.md": "2cf24dba5fb0a30e26e83b2ac5b9e29e" })
    );
}

#[test]
fn test_compute_ignores_path_and_mtime() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("one.md");
    let second = temp_dir.path().join("sub/two.md");
    fs::create_dir_all(second.parent().unwrap()).unwrap();
    fs::write(&first, "same bytes").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));
    fs::write(&second, "same bytes").unwrap();

    assert_eq!(
        FingerprintStore::compute(&fs::read(&first).unwrap()),
        FingerprintStore::compute(&fs::read(&second).unwrap())
    );
}

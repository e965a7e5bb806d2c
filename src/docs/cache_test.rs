use super::*;
use std::fs;
use tempfile::TempDir;

fn write_doc(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_get_missing_is_none() {
    let cache = DocumentCache::new();
    assert!(cache.get("nope.md").is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_reload_replaces_rather_than_duplicates() {
    let cache = DocumentCache::new();
    cache.insert(DocumentRecord::new("a.md", "one".to_string()));
    let replaced = cache.insert(DocumentRecord::new("a.md", "two".to_string()));

    assert_eq!(replaced.unwrap().content(), "one");
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("a.md").unwrap().content(), "two");
    assert_eq!(cache.all_paths(), vec!["a.md".to_string()]);
}

#[test]
fn test_invalidate_then_get_never_returns_old_content() {
    let temp_dir = TempDir::new().unwrap();
    let key = write_doc(&temp_dir, "a.md", "hello");

    let cache = DocumentCache::new();
    cache.populate(load_documents(temp_dir.path(), &[]).records);
    assert_eq!(cache.get(&key).unwrap().content(), "hello");

    fs::write(&key, "hello world").unwrap();
    assert!(cache.invalidate(&key));
    assert!(cache.get(&key).is_none());
    assert!(!cache.invalidate(&key));

    let fresh = cache.refresh(&key).unwrap();
    assert_eq!(fresh.content(), "hello world");
    assert_eq!(cache.get(&key).unwrap().content(), "hello world");
}

#[test]
fn test_refresh_of_deleted_file_leaves_entry_absent() {
    let temp_dir = TempDir::new().unwrap();
    let key = write_doc(&temp_dir, "a.md", "hello");

    let cache = DocumentCache::new();
    cache.refresh(&key).unwrap();
    fs::remove_file(&key).unwrap();

    assert!(cache.refresh(&key).is_err());
    assert!(cache.get(&key).is_none());
}

#[test]
fn test_all_paths_sorted() {
    let cache = DocumentCache::new();
    cache.populate(vec![
        DocumentRecord::new("c.md", String::new()),
        DocumentRecord::new("a.md", String::new()),
        DocumentRecord::new("b.md", String::new()),
    ]);

    assert_eq!(cache.all_paths(), vec!["a.md", "b.md", "c.md"]);
}

#[test]
fn test_total_words() {
    let cache = DocumentCache::new();
    cache.populate(vec![
        DocumentRecord::new("a.md", "one two".to_string()),
        DocumentRecord::new("b.md", "three".to_string()),
    ]);

    assert_eq!(cache.total_words(), 3);
}

#[test]
fn test_verify_empty_cache() {
    let report = DocumentCache::new().verify(DEFAULT_VERIFY_SAMPLE);

    assert_eq!(report.matches, 0);
    assert_eq!(report.mismatches, 0);
    assert_eq!(report.accuracy, 0.0);
}

#[test]
fn test_verify_reports_matches_and_mismatches() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_doc(&temp_dir, "a.md", "alpha");
    let b = write_doc(&temp_dir, "b.md", "beta");
    let c = write_doc(&temp_dir, "c.md", "gamma");
    let d = write_doc(&temp_dir, "d.md", "delta");

    let cache = DocumentCache::new();
    cache.populate(load_documents(temp_dir.path(), &[]).records);

    fs::write(&b, "beta, edited").unwrap();
    fs::remove_file(&d).unwrap();

    let report = cache.verify(DEFAULT_VERIFY_SAMPLE);

    assert_eq!(report.sampled, 4);
    assert_eq!(report.matches, 2);
    assert_eq!(report.mismatches, 2);
    assert_eq!(report.accuracy, 50.0);

    // Diagnostic only: the stale entries are still cached.
    assert_eq!(cache.get(&b).unwrap().content(), "beta");
    assert!(cache.get(&a).is_some());
    assert!(cache.get(&c).is_some());
}

#[test]
fn test_verify_sample_is_bounded() {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..15 {
        write_doc(&temp_dir, &format!("doc-{:02}.md", i), "same");
    }

    let cache = DocumentCache::new();
    cache.populate(load_documents(temp_dir.path(), &[]).records);

    let report = cache.verify(DEFAULT_VERIFY_SAMPLE);

    assert_eq!(cache.len(), 15);
    assert_eq!(report.sampled, 10);
    assert_eq!(report.matches, 10);
    assert_eq!(report.accuracy, 100.0);
    assert!((0.0..=100.0).contains(&report.accuracy));
}

use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn md() -> Vec<String> {
    vec!["md".to_string()]
}

#[test]
fn test_load_skips_archive_segment() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("x.md"), "current standard").unwrap();
    fs::create_dir_all(root.join("[archive]")).unwrap();
    fs::write(root.join("[archive]/y.md"), "old standard").unwrap();

    let outcome = load_documents(root, &md());

    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.records[0].path().ends_with("x.md"));
    assert!(outcome.skipped.is_empty());
}

#[test]
fn test_load_missing_directory_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let outcome = load_documents(&temp_dir.path().join("nope"), &md());

    assert!(outcome.records.is_empty());
    assert!(outcome.skipped.is_empty());
}

#[test]
fn test_load_filters_by_extension() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("a.md"), "a").unwrap();
    fs::write(root.join("b.txt"), "b").unwrap();
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("nested/c.md"), "c c").unwrap();

    let outcome = load_documents(root, &md());
    let mut names: Vec<String> = outcome
        .records
        .iter()
        .map(|r| {
            std::path::Path::new(r.path())
                .file_name()
                .unwrap()
                .to_string_lossy()
                .to_string()
        })
        .collect();
    names.sort();

    assert_eq!(names, vec!["a.md", "c.md"]);

    let everything = load_documents(root, &[]);
    assert_eq!(everything.records.len(), 3);
}

#[test]
fn test_load_skips_non_utf8_without_aborting() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("bad.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    fs::write(root.join("good.md"), "fine text").unwrap();

    let outcome = load_documents(root, &md());

    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.records[0].path().ends_with("good.md"));
    assert_eq!(outcome.skipped.len(), 1);
    assert!(outcome.skipped[0].path.ends_with("bad.md"));
    assert!(outcome.skipped[0].reason.contains("UTF-8"));
}

#[test]
fn test_load_computes_word_counts() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("w.md"), "alpha beta gamma").unwrap();

    let outcome = load_documents(temp_dir.path(), &md());

    assert_eq!(outcome.records[0].word_count(), 3);
    assert_eq!(
        outcome.records[0].fingerprint(),
        &Fingerprint::compute(b"alpha beta gamma")
    );
}

#[test]
fn test_load_file_missing() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_file(&temp_dir.path().join("gone.md"));

    assert!(matches!(
        result.unwrap_err(),
        RegistryError::FileUnreadable { .. }
    ));
}

#[test]
fn test_load_does_not_consult_ignore_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join(".ignore"), "a.md\n").unwrap();
    fs::write(root.join(".gitignore"), "b.md\n").unwrap();
    fs::write(root.join("a.md"), "kept").unwrap();
    fs::write(root.join("b.md"), "kept too").unwrap();
    fs::write(root.join(".hidden.md"), "hidden").unwrap();

    let outcome = load_documents(root, &md());

    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records[0].path().ends_with("a.md"));
    assert!(outcome.records[1].path().ends_with("b.md"));
    assert!(outcome.skipped.is_empty());
}

#[test]
fn test_load_keys_are_normalised() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("docs");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.md"), "hello").unwrap();

    let outcome = load_documents(&root.join("."), &md());

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(
        outcome.records[0].path(),
        root.join("a.md").to_string_lossy()
    );
}

#[test]
fn test_filter_key_collapses_aliases() {
    let filter = DocumentFilter::new(Path::new("/srv/docs"), &md());

    assert_eq!(filter.key(Path::new("/srv/docs/./a.md")), "/srv/docs/a.md");
    assert_eq!(filter.key(Path::new("/srv/docs/x/../a.md")), "/srv/docs/a.md");
    assert_eq!(filter.key(Path::new("/srv/./docs/a.md")), "/srv/docs/a.md");
    assert_eq!(filter.key(Path::new("notes/b.md")), "notes/b.md");
}

#[test]
fn test_filter_key_rebases_absolute_onto_relative_root() {
    let filter = DocumentFilter::new(Path::new("./docs"), &md());
    let absolute = std::path::absolute("docs/sub/a.md").unwrap();

    assert_eq!(filter.root(), Path::new("docs"));
    assert_eq!(filter.key(&absolute), "docs/sub/a.md");
    assert_eq!(filter.key(Path::new("docs/sub/../a.md")), "docs/a.md");
}

#[test]
fn test_filter_accepts_only_loadable_documents() {
    let filter = DocumentFilter::new(Path::new("/srv/docs"), &md());

    assert!(filter.accepts("/srv/docs/a.md"));
    assert!(filter.accepts("/srv/docs/nested/b.md"));
    assert!(!filter.accepts("/srv/docs/[archive]/old.md"));
    assert!(!filter.accepts("/srv/docs/notes.txt"));
    assert!(!filter.accepts("/srv/other/a.md"));
    assert!(!filter.accepts("/srv/docs"));
}

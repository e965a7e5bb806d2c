use crate::config::*;
use crate::dispatch::DependencyTable;
use std::path::PathBuf;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.path().join("docreg.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let overrides = Overrides {
        config_file: Some(write_config(&temp_dir, "{}")),
        ..Default::default()
    };

    let config = Config::resolve_with(&overrides, |key| match key {
        "HOME" => Some("/home/me".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.root, PathBuf::from("docs"));
    assert_eq!(config.extensions, vec!["md"]);
    assert_eq!(config.state_dir, PathBuf::from("/home/me/.local/share/docreg"));
    assert_eq!(config.verify_sample, 10);
    assert_eq!(config.dependencies, DependencyTable::default_edges());
    assert!(config.actions.is_empty());
}

#[test]
fn test_file_values_apply() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
root: platform/docs
extensions: [md, txt]
state_dir: /var/lib/docreg
verify_sample: 3
dependencies:
  - category: dependency-map
    patterns: [dependency_map]
    actions: [invalidate-cache, notify]
actions:
  notify:
    command: ./notify.sh
    args: ["{path}"]
standards:
  change-detector: [doc-standard-12]
"#,
    );
    let overrides = Overrides {
        config_file: Some(path),
        ..Default::default()
    };

    let config = Config::resolve_with(&overrides, no_env).unwrap();

    assert_eq!(config.root, PathBuf::from("platform/docs"));
    assert_eq!(config.extensions, vec!["md", "txt"]);
    assert_eq!(config.state_dir, PathBuf::from("/var/lib/docreg"));
    assert_eq!(config.verify_sample, 3);
    assert_eq!(config.dependencies.len(), 1);
    assert_eq!(config.dependencies[0].actions, vec!["invalidate-cache", "notify"]);
    assert_eq!(config.actions["notify"].command, "./notify.sh");
    assert_eq!(config.actions["notify"].args, vec!["{path}"]);
    assert_eq!(config.standards["change-detector"], vec!["doc-standard-12"]);
}

#[test]
fn test_env_overrides_file_and_cli_overrides_env() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "root: from-file\nstate_dir: file-state\n");

    let env = |key: &str| match key {
        "DOCREG_ROOT" => Some("from-env".to_string()),
        "DOCREG_STATE_DIR" => Some("env-state".to_string()),
        _ => None,
    };

    let config = Config::resolve_with(
        &Overrides {
            config_file: Some(path.clone()),
            ..Default::default()
        },
        env,
    )
    .unwrap();
    assert_eq!(config.root, PathBuf::from("from-env"));
    assert_eq!(config.state_dir, PathBuf::from("env-state"));

    let config = Config::resolve_with(
        &Overrides {
            config_file: Some(path),
            root: Some(PathBuf::from("from-cli")),
            state_dir: None,
            extensions: vec!["txt".to_string()],
        },
        env,
    )
    .unwrap();
    assert_eq!(config.root, PathBuf::from("from-cli"));
    assert_eq!(config.state_dir, PathBuf::from("env-state"));
    assert_eq!(config.extensions, vec!["txt"]);
}

#[test]
fn test_missing_explicit_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let overrides = Overrides {
        config_file: Some(temp_dir.path().join("absent.yaml")),
        ..Default::default()
    };

    let err = Config::resolve_with(&overrides, no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_unknown_key_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let overrides = Overrides {
        config_file: Some(write_config(&temp_dir, "rooot: typo\n")),
        ..Default::default()
    };

    let err = Config::resolve_with(&overrides, no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_empty_command_is_invalid() {
    let temp_dir = TempDir::new().unwrap();
    let overrides = Overrides {
        config_file: Some(write_config(
            &temp_dir,
            "actions:\n  notify:\n    command: \"  \"\n",
        )),
        ..Default::default()
    };

    let err = Config::resolve_with(&overrides, no_env).unwrap_err();
    assert!(err.to_string().contains("notify"));
}

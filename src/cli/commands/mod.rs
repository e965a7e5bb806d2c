pub mod detect;
pub mod dispatch;
pub mod documents;
pub mod standards;
pub mod verify;






/// Shared fixture for command tests: a document root with one file and an
/// isolated state directory.
#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::Config;
    use crate::context::RegistryContext;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub(crate) struct TestRegistry {
        pub(crate) _temp_dir: TempDir,
        pub(crate) root: PathBuf,
        pub(crate) ctx: RegistryContext,
    }

    impl TestRegistry {
        pub(crate) fn file(&self, name: &str) -> String {
            self.root.join(name).to_string_lossy().to_string()
        }
    }

    pub(crate) fn registry_with(files: &[(&str, &str)]) -> TestRegistry {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("docs");
        std::fs::create_dir_all(&root).unwrap();
        for (name, content) in files {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }

        let mut config = Config::with_state_dir(temp_dir.path().join("state"));
        config.root = root.clone();
        let ctx = RegistryContext::init(config).unwrap();

        TestRegistry {
            _temp_dir: temp_dir,
            root,
            ctx,
        }
    }
}

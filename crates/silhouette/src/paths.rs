//! Locates the silhouette config directory and the scene file inside it,
//! honouring the `SILHOUETTE_CONFIG_DIR` override.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "SILHOUETTE_CONFIG_DIR";
pub const CONFIG_FILE_NAME: &str = "scene.toml";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "silhouette";
const APPLICATION: &str = "silhouette";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    from_env: bool,
}

/// Where the active scene configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config FILE`.
    Explicit(PathBuf),
    /// `scene.toml` found in the config directory.
    Discovered(PathBuf),
    /// No file; built-in values.
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Discovered(path) => Some(path),
            Self::Defaults => None,
        }
    }
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        if let Some(config_dir) = env_override(ENV_CONFIG_DIR) {
            return Ok(Self {
                config_dir,
                from_env: true,
            });
        }

        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or_else(|| anyhow!("failed to determine user directories"))?;
        Ok(Self {
            config_dir: project_dirs.config_dir().to_path_buf(),
            from_env: false,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// True when the directory came from `SILHOUETTE_CONFIG_DIR`.
    pub fn config_dir_from_env(&self) -> bool {
        self.from_env
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// An explicit path always wins; otherwise the scene file is used only if it exists.
    pub fn config_source(&self, explicit: Option<&Path>) -> ConfigSource {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(path.to_path_buf());
        }
        let candidate = self.config_file();
        if candidate.is_file() {
            ConfigSource::Discovered(candidate)
        } else {
            ConfigSource::Defaults
        }
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_lock() -> &'static Mutex<()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvGuard {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &Path) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = self.previous.take() {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn env_override_sets_config_dir() {
        let _guard = env_lock().lock().unwrap();
        let root = TempDir::new().unwrap();
        let _env = EnvGuard::set(ENV_CONFIG_DIR, root.path());

        let paths = AppPaths::discover().unwrap();
        assert_eq!(paths.config_dir(), root.path());
        assert!(paths.config_dir_from_env());
        assert_eq!(paths.config_file(), root.path().join("scene.toml"));
    }

    #[test]
    fn missing_scene_file_falls_back_to_defaults() {
        let _guard = env_lock().lock().unwrap();
        let root = TempDir::new().unwrap();
        let _env = EnvGuard::set(ENV_CONFIG_DIR, root.path());

        let paths = AppPaths::discover().unwrap();
        assert_eq!(paths.config_source(None), ConfigSource::Defaults);
        assert_eq!(paths.config_source(None).path(), None);
    }

    #[test]
    fn existing_scene_file_is_discovered() {
        let _guard = env_lock().lock().unwrap();
        let root = TempDir::new().unwrap();
        let file = root.path().join(CONFIG_FILE_NAME);
        fs::write(&file, "version = 1\n").unwrap();
        let _env = EnvGuard::set(ENV_CONFIG_DIR, root.path());

        let paths = AppPaths::discover().unwrap();
        assert_eq!(paths.config_source(None), ConfigSource::Discovered(file));
    }

    #[test]
    fn explicit_path_wins_even_when_missing() {
        let _guard = env_lock().lock().unwrap();
        let root = TempDir::new().unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "version = 1\n").unwrap();
        let _env = EnvGuard::set(ENV_CONFIG_DIR, root.path());

        let explicit = root.path().join("other.toml");
        let paths = AppPaths::discover().unwrap();
        assert_eq!(
            paths.config_source(Some(&explicit)),
            ConfigSource::Explicit(explicit.clone())
        );
    }
}

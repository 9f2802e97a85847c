//! Filesystem-backed `ConfigStore` using the platform config directory.

use crate::store::{ConfigError, ConfigStore};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Stores configs as JSON files under the platform config directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Creates a store rooted at the user config directory (e.g. `~/.config/azrael`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "azrael", "azrael")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::at(proj.config_dir().to_path_buf())
    }

    /// Creates a store rooted at an explicit directory, for tests and overrides.
    pub fn at(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigService;

    #[test]
    fn round_trips_through_the_filesystem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsConfigStore::at(dir.path().to_path_buf()).expect("store");
        let svc = ConfigService::new(store);
        svc.save("orchestrator", &42u32).expect("save");
        let loaded: Option<u32> = svc.load("orchestrator").expect("load");
        assert_eq!(loaded, Some(42));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsConfigStore::at(dir.path().to_path_buf()).expect("store");
        assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
    }
}

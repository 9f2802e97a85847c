use azrael_config::{ConfigError, ConfigStore};
use azrael_core::{Body, BodyId};
use std::collections::BTreeMap;
use tracing::warn;

const SNAPSHOT_KEY: &str = "state_store_snapshot";

/// Periodic flush/reload of the full body set through a [`ConfigStore`].
///
/// The orchestrator's store is not required to be crash-durable on its own;
/// this adapter is how "survive orchestrator restarts" (spec §4.1) is
/// satisfied without introducing a database dependency — `GetAll()` is
/// flushed to a JSON blob the same way `azrael-config` already persists
/// settings, and `load` replays it back into a fresh [`crate::InMemoryStore`].
pub struct SnapshotPersistence<S> {
    store: S,
}

impl<S: ConfigStore> SnapshotPersistence<S> {
    /// Wraps a [`ConfigStore`] as a body-snapshot persistence port.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists the full body set.
    ///
    /// # Errors
    /// Returns the underlying [`ConfigError`] if serialization or the write
    /// itself fails.
    pub fn save(&self, bodies: &BTreeMap<BodyId, Body>) -> Result<(), ConfigError> {
        let data = serde_json::to_vec(bodies)?;
        self.store.save_raw(SNAPSHOT_KEY, &data)
    }

    /// Loads the last-persisted body set, or an empty map if none exists yet.
    ///
    /// # Errors
    /// Returns the underlying [`ConfigError`] if a snapshot exists but fails
    /// to deserialize.
    pub fn load(&self) -> Result<BTreeMap<BodyId, Body>, ConfigError> {
        match self.store.load_raw(SNAPSHOT_KEY) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(ConfigError::NotFound) => {
                warn!("no prior state-store snapshot found, starting empty");
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azrael_config::FsConfigStore;
    use azrael_core::Shape;

    fn sample_body() -> Body {
        Body {
            position: [0.0, 0.0, 0.0],
            orientation: [0.0, 0.0, 0.0, 1.0],
            v_lin: [0.0, 0.0, 0.0],
            v_ang: [0.0, 0.0, 0.0],
            inv_mass: 1.0,
            restitution: 0.0,
            friction: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            shape: Shape::Sphere { radius: 1.0 },
            scale: 1.0,
            boosters: Vec::new(),
            version: 3,
            aabb: None,
            sleeping: false,
            sleep_ticks: 0,
        }
    }

    #[test]
    fn round_trips_a_body_set_through_the_filesystem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fs_store = FsConfigStore::at(dir.path().to_path_buf()).expect("fs store");
        let persistence = SnapshotPersistence::new(fs_store);

        let mut bodies = BTreeMap::new();
        bodies.insert(BodyId::new(1), sample_body());
        persistence.save(&bodies).expect("save");

        let loaded = persistence.load().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&BodyId::new(1)].version, 3);
    }

    #[test]
    fn missing_snapshot_loads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fs_store = FsConfigStore::at(dir.path().to_path_buf()).expect("fs store");
        let persistence = SnapshotPersistence::new(fs_store);
        assert!(persistence.load().expect("load").is_empty());
    }
}

use crate::{CommitOutcome, StateStore};
use azrael_core::{Body, BodyId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, trace};

const CHANGE_FEED_CAPACITY: usize = 4096;

/// In-process [`StateStore`] backed by a `Mutex<BTreeMap<..>>`.
///
/// This is the only required implementation; `BTreeMap` gives deterministic
/// iteration order for `get_all`, matching the ordering guarantees the
/// orchestrator's broadphase pass relies on.
pub struct InMemoryStore {
    bodies: Mutex<BTreeMap<BodyId, Body>>,
    next_id: AtomicU64,
    changes: broadcast::Sender<(BodyId, u64)>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _rx) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            bodies: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
            changes,
        }
    }

    /// Creates a store pre-populated from a restored snapshot, continuing id
    /// assignment above the highest id present.
    #[must_use]
    pub fn from_bodies(bodies: BTreeMap<BodyId, Body>) -> Self {
        let next = bodies.keys().map(|id| id.value() + 1).max().unwrap_or(0);
        let (changes, _rx) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            bodies: Mutex::new(bodies),
            next_id: AtomicU64::new(next),
            changes,
        }
    }

    fn notify(&self, id: BodyId, version: u64) {
        // Dropped receivers are not an error; a change feed with no
        // subscribers is the common case outside of the façade.
        let _ = self.changes.send((id, version));
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStore {
    fn get(&self, ids: &[BodyId]) -> BTreeMap<BodyId, Body> {
        let bodies = self.bodies.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        ids.iter()
            .filter_map(|id| bodies.get(id).map(|body| (*id, body.clone())))
            .collect()
    }

    fn get_all(&self) -> BTreeMap<BodyId, Body> {
        self.bodies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn add(&self, body: Body) -> BodyId {
        let id = BodyId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let version = body.version;
        self.bodies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id, body);
        debug!(body = %id, "spawned body");
        self.notify(id, version);
        id
    }

    fn remove(&self, ids: &[BodyId]) {
        let mut bodies = self.bodies.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        for id in ids {
            if bodies.remove(id).is_some() {
                debug!(body = %id, "removed body");
                drop(bodies);
                self.notify(*id, u64::MAX);
                bodies = self.bodies.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            }
        }
    }

    fn commit_batch(
        &self,
        writes: BTreeMap<BodyId, Body>,
        expected_versions: &BTreeMap<BodyId, u64>,
    ) -> CommitOutcome {
        let mut outcome = CommitOutcome::default();
        let mut applied = Vec::new();
        {
            let mut bodies = self.bodies.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            for (id, mut new_body) in writes {
                let Some(&expected) = expected_versions.get(&id) else {
                    outcome.conflicted.push(id);
                    continue;
                };
                let current_version = bodies.get(&id).map(|b| b.version);
                if current_version != Some(expected) {
                    trace!(body = %id, expected, current = ?current_version, "CAS conflict");
                    outcome.conflicted.push(id);
                    continue;
                }
                new_body.version = expected + 1;
                bodies.insert(id, new_body);
                outcome.committed.push(id);
                applied.push((id, expected + 1));
            }
        }
        for (id, version) in applied {
            self.notify(id, version);
        }
        outcome
    }

    fn subscribe(&self) -> broadcast::Receiver<(BodyId, u64)> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
            version: 0,
            aabb: None,
            sleeping: false,
            sleep_ticks: 0,
        }
    }

    #[test]
    fn add_then_get_round_trips() {
        let store = InMemoryStore::new();
        let id = store.add(sample_body());
        let fetched = store.get(&[id]);
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[&id].version, 0);
    }

    #[test]
    fn commit_with_correct_expected_version_succeeds_and_bumps_version() {
        let store = InMemoryStore::new();
        let id = store.add(sample_body());

        let mut write = sample_body();
        write.position = [1.0, 0.0, 0.0];
        let outcome = store.commit_batch(
            BTreeMap::from([(id, write)]),
            &BTreeMap::from([(id, 0)]),
        );
        assert_eq!(outcome.committed, vec![id]);
        assert!(outcome.conflicted.is_empty());
        assert_eq!(store.get(&[id])[&id].version, 1);
    }

    #[test]
    fn commit_with_stale_expected_version_is_rejected() {
        let store = InMemoryStore::new();
        let id = store.add(sample_body());

        let write = sample_body();
        let outcome = store.commit_batch(
            BTreeMap::from([(id, write)]),
            &BTreeMap::from([(id, 7)]),
        );
        assert_eq!(outcome.conflicted, vec![id]);
        assert!(outcome.committed.is_empty());
        assert_eq!(store.get(&[id])[&id].version, 0);
    }

    #[test]
    fn missing_bodies_are_omitted_from_get() {
        let store = InMemoryStore::new();
        let ghost = BodyId::new(999);
        assert!(store.get(&[ghost]).is_empty());
    }

    #[test]
    fn remove_drops_the_body() {
        let store = InMemoryStore::new();
        let id = store.add(sample_body());
        store.remove(&[id]);
        assert!(store.get(&[id]).is_empty());
    }

    #[test]
    fn subscribers_observe_commits() {
        let store = InMemoryStore::new();
        let mut rx = store.subscribe();
        let id = store.add(sample_body());
        let (changed_id, version) = rx.try_recv().expect("a change was published");
        assert_eq!(changed_id, id);
        assert_eq!(version, 0);
    }
}

//! Key-value persistence for task state.
//!
//! The store persists three keys after every mutation: `points`,
//! `achievements`, and `tasks`, each holding a JSON value. Writes are not
//! transactional across keys. `tasks` is written last, so a crash mid-save
//! leaves the counters slightly stale rather than referencing tasks that no
//! longer exist; hydration heals the counters from the task list.

use crate::error::{Error, Result};
use crate::models::Task;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Storage key for the serialized task collection.
pub const KEY_TASKS: &str = "tasks";
/// Storage key for the derived points counter.
pub const KEY_POINTS: &str = "points";
/// Storage key for the unlocked achievement set.
pub const KEY_ACHIEVEMENTS: &str = "achievements";

/// String key-value storage boundary.
///
/// This is the only interface the store needs from the platform; anything
/// that can hold strings under string keys can back it.
pub trait KeyValueStorage {
    /// Read the value for `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// The full serializable task state at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Task collection in insertion order.
    pub tasks: Vec<Task>,
    /// Derived points counter.
    pub points: u64,
    /// Unlocked achievement ids.
    pub achievements: BTreeSet<String>,
}

impl Snapshot {
    /// Read a snapshot from storage. Absent keys yield empty defaults, so a
    /// first launch loads cleanly.
    ///
    /// # Errors
    ///
    /// Returns an error if a key cannot be read or its JSON cannot be
    /// parsed.
    pub fn load<S: KeyValueStorage>(storage: &S) -> Result<Self> {
        let tasks = match storage.get(KEY_TASKS)? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };
        let points = match storage.get(KEY_POINTS)? {
            Some(json) => serde_json::from_str(&json)?,
            None => 0,
        };
        let achievements = match storage.get(KEY_ACHIEVEMENTS)? {
            Some(json) => serde_json::from_str(&json)?,
            None => BTreeSet::new(),
        };

        Ok(Self { tasks, points, achievements })
    }

    /// Write the snapshot to storage, one key at a time, `tasks` last (see
    /// module docs).
    ///
    /// # Errors
    ///
    /// Returns the first write error; earlier keys may already have been
    /// written.
    pub fn save<S: KeyValueStorage>(&self, storage: &S) -> Result<()> {
        storage.set(KEY_POINTS, &serde_json::to_string(&self.points)?)?;
        storage.set(KEY_ACHIEVEMENTS, &serde_json::to_string(&self.achievements)?)?;
        storage.set(KEY_TASKS, &serde_json::to_string(&self.tasks)?)?;
        Ok(())
    }
}

/// File-per-key storage backend.
///
/// Each key is stored as `<key>.json` inside the directory; the directory
/// is created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a backend rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory, `~/.pocket-tasks/`, or `None` if the home
    /// directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".pocket-tasks"))
    }

    /// The directory holding the key files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }
}

/// In-memory storage backend.
///
/// Primarily for tests; the failure switch exercises the swallow-and-log
/// persistence path without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self.data.lock().map_err(|_| Error::Storage("lock poisoned".to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage(format!("write rejected: {key}")));
        }
        let mut data =
            self.data.lock().map_err(|_| Error::Storage("lock poisoned".to_string()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let task = Task {
            id: "18f2a40d2b1-00017c3e".to_string(),
            title: "Buy milk".to_string(),
            description: Some("Semi-skimmed".to_string()),
            due: chrono::Utc.with_ymd_and_hms(2026, 8, 29, 9, 0, 0).unwrap(),
            priority: Priority::High,
            completed: true,
        };
        Snapshot {
            tasks: vec![task],
            points: 10,
            achievements: ["5tasks".to_string()].into(),
        }
    }

    #[test]
    fn test_load_empty_storage_yields_defaults() {
        let storage = MemoryStorage::new();
        let snapshot = Snapshot::load(&storage).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        let snapshot = sample_snapshot();
        snapshot.save(&storage).unwrap();
        assert_eq!(Snapshot::load(&storage).unwrap(), snapshot);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let snapshot = sample_snapshot();

        let writer = FileStorage::new(dir.path());
        snapshot.save(&writer).unwrap();

        // A fresh backend over the same directory sees the same state.
        let reader = FileStorage::new(dir.path());
        assert_eq!(Snapshot::load(&reader).unwrap(), snapshot);
    }

    #[test]
    fn test_file_storage_creates_directory_on_write() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data/pocket-tasks");
        let storage = FileStorage::new(&nested);

        storage.set("tasks", "[]").unwrap();
        assert!(nested.join("tasks.json").exists());
    }

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.get("tasks").unwrap().is_none());
    }

    #[test]
    fn test_memory_failure_switch() {
        let storage = MemoryStorage::new();
        storage.set("tasks", "[]").unwrap();

        storage.fail_writes(true);
        assert!(matches!(storage.set("tasks", "[1]"), Err(Error::Storage(_))));
        // Reads still work and see the pre-failure value.
        assert_eq!(storage.get("tasks").unwrap().as_deref(), Some("[]"));

        storage.fail_writes(false);
        storage.set("tasks", "[1]").unwrap();
    }

    #[test]
    fn test_corrupt_tasks_key_is_an_error() {
        let storage = MemoryStorage::new();
        storage.set(KEY_TASKS, "not json").unwrap();
        assert!(matches!(Snapshot::load(&storage), Err(Error::Json(_))));
    }

    fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
        (
            proptest::collection::vec(
                ("[a-z0-9-]{1,20}", "\\PC{1,30}", proptest::option::of("\\PC{0,40}"), any::<bool>()),
                0..10,
            ),
            any::<u64>(),
            proptest::collection::btree_set("[a-z0-9]{1,10}", 0..4),
        )
            .prop_map(|(raw_tasks, points, achievements)| Snapshot {
                tasks: raw_tasks
                    .into_iter()
                    .enumerate()
                    .map(|(i, (id, title, description, completed))| Task {
                        id: format!("{id}-{i}"),
                        title,
                        description,
                        due: chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                            + chrono::Duration::minutes(i64::try_from(i).unwrap()),
                        priority: Priority::default(),
                        completed,
                    })
                    .collect(),
                points,
                achievements,
            })
    }

    proptest! {
        #[test]
        fn prop_snapshot_round_trips(snapshot in arb_snapshot()) {
            let storage = MemoryStorage::new();
            snapshot.save(&storage).unwrap();
            prop_assert_eq!(Snapshot::load(&storage).unwrap(), snapshot);
        }
    }
}

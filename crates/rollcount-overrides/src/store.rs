use std::collections::BTreeMap;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rollcount_core::{persist, StoreError};
use rollcount_logging::StoreEvent;

type Entries = BTreeMap<String, String>;

/// Persisted string-to-string map.
///
/// The current map is published as an immutable `Arc` snapshot. Readers
/// clone the `Arc` and never wait on a writer. `add`, `remove`, `clear`,
/// `load` and `save` are serialized by a separate mutex; each mutation builds
/// a new map and swaps it in.
pub struct OverrideStore {
    path: PathBuf,
    writer: Mutex<()>,
    // Held only long enough to clone or replace the Arc.
    current: RwLock<Arc<Entries>>,
}

/// Read-only snapshot of an [`OverrideStore`].
///
/// Owns its own reference to the map, so it can be kept across mutating
/// calls. Later writes are not visible through it.
#[derive(Debug, Clone)]
pub struct OverrideView {
    entries: Arc<Entries>,
}

impl Deref for OverrideView {
    type Target = Entries;

    fn deref(&self) -> &Entries {
        &self.entries
    }
}

impl OverrideStore {
    /// Empty store backed by `path`. Nothing is read until [`OverrideStore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
            current: RwLock::new(Arc::new(Entries::new())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.snapshot().get(key).cloned()
    }

    pub fn view(&self) -> OverrideView {
        OverrideView {
            entries: self.snapshot(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn add(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.update(|entries| {
            entries.insert(key, value);
        });
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.update(|entries| entries.remove(key))
    }

    /// Empty the in-memory map. The file is left alone.
    pub fn clear(&self) {
        let _writer = self.lock_writer();
        self.publish(Entries::new());
    }

    /// Replace the in-memory map with the file contents.
    ///
    /// The map is cleared first. If the file cannot be read or parsed the
    /// error is logged and the map stays empty; the file is not rewritten.
    /// Returns the number of entries loaded.
    pub fn load(&self) -> usize {
        let _writer = self.lock_writer();
        self.publish(Entries::new());

        match self.read_file() {
            Ok(loaded) => {
                let entries = loaded.len();
                self.publish(loaded);
                StoreEvent::OverridesLoaded {
                    path: self.path.clone(),
                    entries,
                }
                .emit();
                entries
            }
            Err(e) => {
                StoreEvent::OverridesLoadFailed {
                    path: self.path.clone(),
                    error: e.to_string(),
                }
                .emit();
                0
            }
        }
    }

    /// Write the whole map to the file. Returns whether the write succeeded.
    ///
    /// Readers are not blocked while the file is written.
    pub fn save(&self) -> bool {
        let _writer = self.lock_writer();
        let entries = self.snapshot();

        let result = serde_json::to_string_pretty(&*entries)
            .map_err(StoreError::from)
            .and_then(|json| persist::write_text(&self.path, &json));

        match result {
            Ok(()) => {
                StoreEvent::OverridesSaved {
                    path: self.path.clone(),
                    entries: entries.len(),
                }
                .emit();
                true
            }
            Err(e) => {
                StoreEvent::OverridesWriteFailed {
                    path: self.path.clone(),
                    error: e.to_string(),
                }
                .emit();
                false
            }
        }
    }

    fn read_file(&self) -> Result<Entries, StoreError> {
        match persist::read_text(&self.path)? {
            Some(body) if !body.trim().is_empty() => Ok(serde_json::from_str(&body)?),
            _ => Ok(Entries::new()),
        }
    }

    /// Copy the current map, apply `f`, publish the result.
    fn update<R>(&self, f: impl FnOnce(&mut Entries) -> R) -> R {
        let _writer = self.lock_writer();
        let mut next = Entries::clone(&self.snapshot());
        let result = f(&mut next);
        self.publish(next);
        result
    }

    fn snapshot(&self) -> Arc<Entries> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, entries: Entries) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(entries);
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// A keyed cache that runs at most one computation per key.
///
/// The first caller for a key inserts an empty slot and computes the value;
/// callers arriving while that computation is running block on the same slot
/// and receive a clone of its result instead of computing their own. The map
/// lock is only held long enough to find or insert the slot.
#[derive(Debug)]
pub struct SingleFlight<V> {
    slots: Mutex<HashMap<String, Arc<OnceLock<V>>>>,
}

impl<V> Default for SingleFlight<V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> SingleFlight<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it with `init` on first use.
    pub fn get_or_init<F>(&self, key: &str, init: F) -> V
    where
        F: FnOnce() -> V,
    {
        let slot = {
            let mut slots = self.lock();
            Arc::clone(slots.entry(key.to_string()).or_default())
        };
        slot.get_or_init(init).clone()
    }

    /// The completed value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key).and_then(|slot| slot.get().cloned())
    }

    /// Drop the entry for `key` so the next caller computes it again.
    ///
    /// Callers already waiting on an in-flight computation still receive its
    /// result.
    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceLock<V>>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

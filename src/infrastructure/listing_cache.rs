use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::ports::ListingCache;

/// Process-local cache of rendered listing responses, keyed by path and
/// query string. The mutation pipeline invalidates by path prefix, so every
/// cached page and search of a listing goes stale at once.
#[derive(Default)]
pub struct InMemoryListingCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("listing cache mutex poisoned")
            .get(key)
            .cloned()
    }

    pub fn store(&self, key: &str, body: String) {
        self.entries
            .lock()
            .expect("listing cache mutex poisoned")
            .insert(key.to_string(), body);
    }
}

impl ListingCache for InMemoryListingCache {
    fn invalidate(&self, path: &str) {
        let mut entries = self.entries.lock().expect("listing cache mutex poisoned");
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(path));
        log::debug!(
            "invalidated {} cached listing(s) under {}",
            before - entries.len(),
            path
        );
    }
}

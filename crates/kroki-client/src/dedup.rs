//! Fetch deduplication for one conversion run.
//!
//! A document can reference the same diagram many times; the network round
//! trip for a given key must happen at most once per run. The cache keys each
//! fetch by [`CacheKey`] and stores a shared `OnceLock` cell per key: the
//! first caller runs the fetch inside `get_or_init`, concurrent callers block
//! on the same cell until the result lands, later callers read it with no
//! I/O. Failed entries are evicted so a later occurrence can retry; nothing
//! here retries automatically.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use crate::http::FetchError;

/// Identity of one fetched artifact within a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The remote GET URL, used when no explicit target name is given.
    Url(String),
    /// Explicit target file, used when the occurrence names its artifact.
    /// Two occurrences writing the same file share one fetch even if their
    /// sources differ in other options.
    Named { images_dir: PathBuf, name: String },
}

type FetchCell = Arc<OnceLock<Result<Vec<u8>, FetchError>>>;

/// Process-scoped registry guaranteeing at most one fetch per [`CacheKey`].
///
/// Owned by the conversion session and injected into every resolution; no
/// ambient globals, so independent conversions are isolated.
#[derive(Debug, Default)]
pub struct FetchDedupCache {
    entries: Mutex<HashMap<CacheKey, FetchCell>>,
}

impl FetchDedupCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `key` to artifact bytes, invoking `fetch` only if no other
    /// caller has done so.
    ///
    /// A failure is returned to every caller waiting on the key, and the
    /// entry is removed so a later resolution of the same key starts fresh.
    pub fn resolve(
        &self,
        key: CacheKey,
        fetch: impl FnOnce() -> Result<Vec<u8>, FetchError>,
    ) -> Result<Vec<u8>, FetchError> {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        // Blocks concurrent callers of the same key until the first caller's
        // fetch completes; completed cells return immediately.
        let result = cell.get_or_init(fetch);

        if result.is_err() {
            tracing::warn!(?key, "fetch failed, evicting dedup entry");
            self.remove_if_same(&key, &cell);
        }

        result.clone()
    }

    /// Drop the entry for `key`, allowing a future resolution to fetch again.
    ///
    /// Used when a fetched artifact could not be persisted to disk.
    pub fn invalidate(&self, key: &CacheKey) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }

    /// Remove the entry only if it still holds `cell`; a retry that already
    /// installed a fresh cell must not be evicted by a stale loser.
    fn remove_if_same(&self, key: &CacheKey, cell: &FetchCell) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.get(key).is_some_and(|current| Arc::ptr_eq(current, cell)) {
            entries.remove(key);
        }
    }
}

// patterns/cache.rs
use crate::error::SearchError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock,
    },
};
use tracing::trace;

/// Metrics for cache performance monitoring
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    /// Number of successful compilations, including redundant ones
    /// produced by two threads racing on the same new pattern
    pub compilations: u64,
    pub size: usize,
}

impl CacheMetrics {
    /// Calculates the cache hit ratio
    pub fn hit_ratio(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Cache of compiled regular expressions keyed by their source text
///
/// Lookups of patterns already compiled only take the read lock. A new
/// pattern is compiled outside of any lock and inserted under the write
/// lock; when two threads race on the same key the first insert wins and the
/// second compilation is dropped. Entries are never evicted.
///
/// Most callers use the process-wide instance from [`PatternCache::shared`];
/// tests and embedders that need isolation construct their own.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RwLock<HashMap<String, Regex>>,
    hits: AtomicU64,
    misses: AtomicU64,
    compilations: AtomicU64,
}

static SHARED: Lazy<Arc<PatternCache>> = Lazy::new(|| Arc::new(PatternCache::new()));

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the process-wide cache
    pub fn shared() -> Arc<PatternCache> {
        Arc::clone(&SHARED)
    }

    /// Retrieves a compiled Regex from cache or compiles and caches it
    ///
    /// # Errors
    ///
    /// Returns `SearchError::MalformedPattern` if `pattern` does not compile.
    /// Failures are not cached, so every call with the same bad pattern
    /// fails the same way.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Regex, SearchError> {
        if let Some(re) = self.read().get(pattern) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(re.clone());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let re = Regex::new(pattern).map_err(|e| SearchError::malformed(pattern, e))?;
        self.compilations.fetch_add(1, Ordering::Relaxed);
        trace!(pattern, "compiled regex");

        let mut map = self
            .compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(map.entry(pattern.to_string()).or_insert(re).clone())
    }

    /// Returns `true` if `pattern` has already been compiled
    pub fn contains(&self, pattern: &str) -> bool {
        self.read().contains_key(pattern)
    }

    /// Returns current cache metrics
    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            compilations: self.compilations.load(Ordering::Relaxed),
            size: self.read().len(),
        }
    }

    /// Drops every compiled pattern; counters are kept
    pub fn clear(&self) {
        self.compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Regex>> {
        // A panic while holding the lock cannot leave the map half-written,
        // so a poisoned lock is still usable.
        self.compiled.read().unwrap_or_else(PoisonError::into_inner)
    }
}

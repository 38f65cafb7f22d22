// options.rs
use crate::patterns::{cache::PatternCache, Strategy};
use camino::Utf8PathBuf;
use std::{sync::Arc, time::Duration};

/// Configuration options for a search
///
/// Options are read-only for the duration of a search. The traversal
/// counters the walker needs while following symlinks live in a separate
/// budget and are never stored here.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Whether to dereference symbolic links during traversal
    pub follow_symlinks: bool,

    /// Maximum symlink indirections per chain (None for unlimited).
    /// `Some(0)` disables following even when `follow_symlinks` is set.
    pub max_follow: Option<usize>,

    /// Maximum number of subdirectory levels entered below each root
    pub max_depth: usize,

    /// Matching semantics of the pattern
    pub strategy: Strategy,

    /// Fold case of both pattern and candidate names
    pub ignore_case: bool,

    /// Directory that results under relative roots are re-rooted onto
    pub working_dir: Option<Utf8PathBuf>,

    /// Compiled regex cache used by this search
    pub cache: Arc<PatternCache>,

    /// Deadline for the async wrappers (ignored by blocking searches)
    pub timeout: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            max_follow: Some(0),
            max_depth: 1,
            strategy: Strategy::Exact,
            ignore_case: false,
            working_dir: None,
            cache: PatternCache::shared(),
            timeout: None,
        }
    }
}

/// Builder for SearchOptions for fluent configuration
pub struct SearchOptionsBuilder(SearchOptions);

impl Default for SearchOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOptionsBuilder {
    /// Creates a new builder with default options
    pub fn new() -> Self {
        Self(SearchOptions::default())
    }

    /// Sets whether to follow symbolic links
    pub fn follow_symlinks(mut self, v: bool) -> Self {
        self.0.follow_symlinks = v;
        self
    }

    /// Sets the maximum number of indirections resolved per chain.
    /// A negative count means unlimited.
    pub fn max_follow(mut self, n: i64) -> Self {
        self.0.max_follow = usize::try_from(n).ok();
        self
    }

    /// Sets the maximum directory depth to traverse
    pub fn max_depth(mut self, d: usize) -> Self {
        self.0.max_depth = d;
        self
    }

    pub fn strategy(mut self, s: Strategy) -> Self {
        self.0.strategy = s;
        self
    }

    /// Sets case-insensitive matching
    pub fn ignore_case(mut self, v: bool) -> Self {
        self.0.ignore_case = v;
        self
    }

    /// Sets the directory used to make results under relative roots absolute
    pub fn working_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.0.working_dir = Some(dir.into());
        self
    }

    /// Uses `cache` instead of the process-wide pattern cache
    pub fn cache(mut self, cache: Arc<PatternCache>) -> Self {
        self.0.cache = cache;
        self
    }

    /// Sets the timeout for async searches
    pub fn timeout(mut self, t: Duration) -> Self {
        self.0.timeout = Some(t);
        self
    }

    /// Builds the final SearchOptions instance
    pub fn build(self) -> SearchOptions {
        self.0
    }
}

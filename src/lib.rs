// lib.rs
#![forbid(unsafe_code)]

#[cfg(feature = "async")]
pub mod async_search;
pub mod chain;
pub mod error;
pub mod options;
pub mod paths;
pub mod patterns;
mod walk;

pub use crate::error::{SearchError, WalkFailure, WalkFailures};
pub use crate::options::{SearchOptions, SearchOptionsBuilder};
pub use crate::paths::{split_path_list, validate_root};
pub use crate::patterns::{cache::PatternCache, CompiledPattern, Strategy};

use camino::Utf8Path;
use rayon::prelude::*;
use tracing::debug;

/// Matches found by one search, plus the filesystem errors met on the way
#[derive(Debug, Default)]
pub struct Found {
    /// Result paths and rendered symlink chains, in traversal order
    pub paths: Vec<String>,
    /// Roots that could not be fully traversed
    pub failures: WalkFailures,
}

impl Found {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The first match, for front ends that only report one
    pub fn first(&self) -> Option<&str> {
        self.paths.first().map(String::as_str)
    }

    /// Converts into a plain result, turning any walk failure into
    /// `SearchError::WalkFailures`. Partial results are dropped in that
    /// case; use the fields directly to keep both.
    pub fn into_result(self) -> Result<Vec<String>, SearchError> {
        if self.failures.is_empty() {
            Ok(self.paths)
        } else {
            Err(SearchError::WalkFailures(self.failures))
        }
    }
}

/// Main facade for the whichhunt library
pub struct WhichHunt;

impl WhichHunt {
    /// Finds files below `roots` whose base names match `pattern`
    ///
    /// Roots are walked in the order given. The pattern is folded for
    /// `opts.ignore_case` and compiled once before any traversal starts.
    ///
    /// # Examples
    ///
    /// ```
    /// use whichhunt::{SearchOptionsBuilder, Strategy, WhichHunt};
    ///
    /// let opts = SearchOptionsBuilder::new()
    ///     .strategy(Strategy::Glob)
    ///     .max_depth(2)
    ///     .build();
    /// let found = WhichHunt::search("*.rs", &["src"], &opts).unwrap();
    /// assert!(found.failures.is_empty());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidPath` for an unusable root and
    /// `SearchError::MalformedPattern` for a pattern that does not compile.
    /// Both are detected before the filesystem is touched. Filesystem
    /// errors are not returned here but collected in `Found::failures`.
    pub fn search(
        pattern: &str,
        roots: &[&str],
        opts: &SearchOptions,
    ) -> Result<Found, SearchError> {
        let roots = roots
            .iter()
            .map(|r| {
                validate_root(r)?;
                Ok(paths::clean(Utf8Path::new(r)))
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        let folded = opts.strategy.fold(pattern, opts.ignore_case);
        let compiled = opts.strategy.compile(&opts.cache, &folded)?;
        debug!(
            pattern = %folded,
            strategy = %opts.strategy,
            roots = roots.len(),
            "searching"
        );

        let (paths, failures) = walk::walk_roots(opts, &compiled, &roots);
        Ok(Found { paths, failures })
    }

    /// Same as [`WhichHunt::search`] with exact name matching
    pub fn search_fixed(
        pattern: &str,
        roots: &[&str],
        opts: &SearchOptions,
    ) -> Result<Found, SearchError> {
        Self::with_strategy(Strategy::Exact, pattern, roots, opts)
    }

    /// Same as [`WhichHunt::search`] with shell glob matching
    pub fn search_glob(
        pattern: &str,
        roots: &[&str],
        opts: &SearchOptions,
    ) -> Result<Found, SearchError> {
        Self::with_strategy(Strategy::Glob, pattern, roots, opts)
    }

    /// Same as [`WhichHunt::search`] with regular expression matching
    pub fn search_regexp(
        pattern: &str,
        roots: &[&str],
        opts: &SearchOptions,
    ) -> Result<Found, SearchError> {
        Self::with_strategy(Strategy::Regexp, pattern, roots, opts)
    }

    /// Runs one independent search per pattern on the rayon thread pool
    ///
    /// Results keep the order of `patterns`. Each search walks its roots on
    /// a single thread; only the pattern cache is shared between them.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any pattern is malformed or any root invalid.
    pub fn search_each(
        patterns: &[&str],
        roots: &[&str],
        opts: &SearchOptions,
    ) -> Result<Vec<Found>, SearchError> {
        patterns
            .par_iter()
            .map(|p| Self::search(p, roots, opts))
            .collect()
    }

    fn with_strategy(
        strategy: Strategy,
        pattern: &str,
        roots: &[&str],
        opts: &SearchOptions,
    ) -> Result<Found, SearchError> {
        let opts = SearchOptions {
            strategy,
            ..opts.clone()
        };
        Self::search(pattern, roots, &opts)
    }
}

// walk.rs
use crate::{
    chain::{Chain, ResolveError},
    error::{SearchError, WalkFailure, WalkFailures},
    paths::clean,
    patterns::CompiledPattern,
    SearchOptions,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Traversal state carried into the walk below a followed symlink
///
/// Each nested walk gets its own copy; the caller's budget never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Budget {
    /// Depth already consumed before the current walk root
    pub depth_offset: usize,
    /// Symlinked directories already entered above this walk
    pub follow_count: usize,
    /// Whether symlinks are dereferenced in this walk
    pub follow: bool,
}

impl Budget {
    pub fn new(opts: &SearchOptions) -> Self {
        Self {
            depth_offset: 0,
            follow_count: 0,
            follow: opts.follow_symlinks && opts.max_follow != Some(0),
        }
    }

    /// Indirections a single chain may still take (None for unlimited)
    pub fn remaining(&self, max_follow: Option<usize>) -> Option<usize> {
        max_follow.map(|m| m.saturating_sub(self.follow_count))
    }

    /// Budget for the walk of a directory reached through a symlink at
    /// `depth`. Every symlinked directory costs one follow, however many
    /// indirections it took to resolve.
    pub fn descend(self, depth: usize, max_follow: Option<usize>) -> Self {
        let follow_count = self.follow_count + 1;
        Self {
            depth_offset: depth,
            follow_count,
            follow: self.follow && max_follow.map_or(true, |m| follow_count < m),
        }
    }
}

/// Depth-first walker over one root at a time
pub(crate) struct Walker<'a> {
    opts: &'a SearchOptions,
    pattern: &'a CompiledPattern,
}

impl<'a> Walker<'a> {
    pub fn new(opts: &'a SearchOptions, pattern: &'a CompiledPattern) -> Self {
        Self { opts, pattern }
    }

    /// Walks `root`, appending results to `found` and filesystem errors to
    /// `errors`. Nothing here fails the walk: every error is recorded and the
    /// offending subtree or entry is skipped.
    pub fn walk(
        &self,
        root: &Utf8Path,
        budget: Budget,
        found: &mut Vec<String>,
        errors: &mut Vec<io::Error>,
    ) {
        let max_depth = self.opts.max_depth;
        let mut it = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = it.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(root = %root, error = %err, "skipping unreadable entry");
                    errors.push(err.into());
                    continue;
                }
            };

            if entry.depth() == 0 {
                if !entry.file_type().is_dir() {
                    debug!(root = %root, "root is not a directory");
                    errors.push(io::Error::other(format!("{root}: not a directory")));
                }
                continue;
            }

            let Some(path) = Utf8Path::from_path(entry.path()) else {
                trace!(path = ?entry.path(), "skipping non UTF-8 path");
                continue;
            };
            let depth = entry.depth() + budget.depth_offset;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if depth >= max_depth {
                    debug!(
                        "{}",
                        SearchError::MaxDepthExceeded {
                            depth: max_depth,
                            path: path.to_path_buf(),
                        }
                    );
                    it.skip_current_dir();
                }
                continue;
            }

            if file_type.is_symlink() && budget.follow {
                self.follow(path, depth, budget, found, errors);
                continue;
            }

            if self.name_matches(path) {
                found.push(self.display(path));
            }
        }
    }

    /// Resolves the symlink at `path` and either walks the directory it
    /// leads to or matches the file it leads to. A chain longer than the
    /// remaining budget is not followed and the link is matched as is.
    fn follow(
        &self,
        path: &Utf8Path,
        depth: usize,
        budget: Budget,
        found: &mut Vec<String>,
        errors: &mut Vec<io::Error>,
    ) {
        let max_follow = self.opts.max_follow;
        let chain = match Chain::resolve(path, budget.remaining(max_follow)) {
            Ok(chain) => chain,
            Err(ResolveError::OverBudget(limit)) => {
                // Too long to follow: the link stays an ordinary entry.
                trace!(path = %path, limit, "symlink chain exceeds follow budget");
                if self.name_matches(path) {
                    found.push(self.display(path));
                }
                return;
            }
            Err(err) => {
                debug!(path = %path, error = %err, "not following symlink");
                return;
            }
        };
        let terminal = chain.terminal();

        if terminal.metadata().is_dir() {
            // Any number of indirections counts as a single level.
            if depth + 1 > self.opts.max_depth {
                trace!(path = %path, depth, "symlinked directory beyond max depth");
                return;
            }
            let nested = budget.descend(depth, max_follow);
            trace!(path = %path, resolved = %terminal.path(), ?nested, "entering symlinked directory");

            let mut below = Vec::new();
            self.walk(terminal.path(), nested, &mut below, errors);
            found.extend(
                below
                    .iter()
                    .map(|tail| chain.render_onto(tail, |p| self.display(p))),
            );
            return;
        }

        if self.name_matches(terminal.path()) {
            found.push(chain.render(|p| self.display(p)));
        }
    }

    /// Tests the base name of `path` against the pattern
    fn name_matches(&self, path: &Utf8Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if self.opts.ignore_case {
            self.pattern.is_match(&name.to_lowercase())
        } else {
            self.pattern.is_match(name)
        }
    }

    /// Display form of a path: cleaned, and made absolute against the
    /// working directory when it is relative
    fn display(&self, path: &Utf8Path) -> String {
        let cleaned = clean(path);
        match &self.opts.working_dir {
            Some(wd) if cleaned.is_relative() => clean(&wd.join(&cleaned)).into_string(),
            _ => cleaned.into_string(),
        }
    }
}

/// Walks every root in order, stopping at nothing but returning the errors
/// of each root separately
pub(crate) fn walk_roots(
    opts: &SearchOptions,
    pattern: &CompiledPattern,
    roots: &[Utf8PathBuf],
) -> (Vec<String>, WalkFailures) {
    let walker = Walker::new(opts, pattern);
    let mut found = Vec::new();
    let mut failures = WalkFailures::default();

    for root in roots {
        let mut errors = Vec::new();
        walker.walk(root, Budget::new(opts), &mut found, &mut errors);
        if !errors.is_empty() {
            failures.0.push(WalkFailure {
                root: root.clone(),
                causes: errors,
            });
        }
    }

    (found, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchOptionsBuilder;

    #[test]
    fn follow_is_off_when_max_follow_is_zero() {
        let opts = SearchOptionsBuilder::new()
            .follow_symlinks(true)
            .max_follow(0)
            .build();
        assert!(!Budget::new(&opts).follow);

        let opts = SearchOptionsBuilder::new()
            .follow_symlinks(true)
            .max_follow(-1)
            .build();
        assert!(Budget::new(&opts).follow);
    }

    #[test]
    fn descend_disables_follow_once_budget_is_spent() {
        let budget = Budget {
            depth_offset: 0,
            follow_count: 0,
            follow: true,
        };

        let nested = budget.descend(2, Some(2));
        assert_eq!(nested.depth_offset, 2);
        assert_eq!(nested.follow_count, 1);
        assert!(nested.follow);
        assert_eq!(nested.remaining(Some(2)), Some(1));

        let nested = nested.descend(3, Some(2));
        assert_eq!(nested.follow_count, 2);
        assert!(!nested.follow);

        let unlimited = budget.descend(1, None).descend(2, None).descend(3, None);
        assert_eq!(unlimited.follow_count, 3);
        assert!(unlimited.follow);
        assert_eq!(unlimited.remaining(None), None);
    }

    #[test]
    fn descend_leaves_the_caller_budget_untouched() {
        let budget = Budget {
            depth_offset: 1,
            follow_count: 0,
            follow: true,
        };
        let _ = budget.descend(4, Some(1));
        assert_eq!(budget.depth_offset, 1);
        assert_eq!(budget.follow_count, 0);
        assert!(budget.follow);
    }
}

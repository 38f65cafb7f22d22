pub mod cache;

use crate::error::SearchError;
use cache::PatternCache;
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use std::{borrow::Cow, fmt, str::FromStr};

/// Matching semantics applied to file base names
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Whole name compared verbatim
    #[default]
    Exact,
    /// Shell glob: `*`, `?` and `[...]`, wildcards never cross a separator
    Glob,
    /// Regular expression, matching anywhere in the name
    Regexp,
}

impl Strategy {
    /// Reports whether `candidate` matches `pattern` under this strategy
    ///
    /// Regexp patterns are compiled through `cache`, so repeated calls with
    /// the same pattern compile it once.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::MalformedPattern` for an invalid glob or regex.
    /// `Exact` never fails.
    pub fn matches(
        self,
        cache: &PatternCache,
        pattern: &str,
        candidate: &str,
    ) -> Result<bool, SearchError> {
        Ok(self.compile(cache, pattern)?.is_match(candidate))
    }

    /// Compiles `pattern` once for matching many candidates
    pub fn compile(
        self,
        cache: &PatternCache,
        pattern: &str,
    ) -> Result<CompiledPattern, SearchError> {
        match self {
            Strategy::Exact => Ok(CompiledPattern::Exact(pattern.to_string())),
            Strategy::Glob => {
                let glob = GlobBuilder::new(pattern)
                    .literal_separator(true)
                    .backslash_escape(true)
                    .build()
                    .map_err(|e| SearchError::malformed(pattern, e.kind()))?;
                Ok(CompiledPattern::Glob(glob.compile_matcher()))
            }
            Strategy::Regexp => Ok(CompiledPattern::Regexp(cache.get_or_compile(pattern)?)),
        }
    }

    /// Applies case folding to a pattern before it is compiled
    ///
    /// Exact and glob patterns are lower-cased to line up with lower-cased
    /// candidates. Regexp patterns get an inline `(?i)` flag instead, which
    /// makes the folded form a distinct cache key.
    pub fn fold(self, pattern: &str, ignore_case: bool) -> Cow<'_, str> {
        if !ignore_case {
            return Cow::Borrowed(pattern);
        }
        match self {
            Strategy::Exact | Strategy::Glob => Cow::Owned(pattern.to_lowercase()),
            Strategy::Regexp => Cow::Owned(format!("(?i){pattern}")),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Glob => "glob",
            Strategy::Regexp => "regexp",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" | "fixed" => Ok(Strategy::Exact),
            "glob" => Ok(Strategy::Glob),
            "regexp" | "regex" => Ok(Strategy::Regexp),
            other => Err(SearchError::malformed(other, "unknown match strategy")),
        }
    }
}

/// A pattern ready to test candidates against
#[derive(Clone, Debug)]
pub enum CompiledPattern {
    Exact(String),
    Glob(GlobMatcher),
    Regexp(Regex),
}

impl CompiledPattern {
    pub fn strategy(&self) -> Strategy {
        match self {
            CompiledPattern::Exact(_) => Strategy::Exact,
            CompiledPattern::Glob(_) => Strategy::Glob,
            CompiledPattern::Regexp(_) => Strategy::Regexp,
        }
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        match self {
            CompiledPattern::Exact(p) => p == candidate,
            CompiledPattern::Glob(g) => g.is_match(candidate),
            CompiledPattern::Regexp(re) => re.is_match(candidate),
        }
    }
}

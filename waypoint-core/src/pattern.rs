//! Shell-glob path patterns compiled to anchored regexes.
//!
//! Patterns use `*` as the only wildcard and match case-sensitively against
//! the full request path with the leading `/` stripped (the root path stays
//! `/`). An empty pattern list never matches.

use regex::Regex;

/// An ordered list of glob patterns, compiled once at construction.
#[derive(Debug, Clone)]
pub struct PatternList {
    patterns: Vec<String>,
    compiled: Vec<Regex>,
}

impl PatternList {
    /// Compiles the given glob patterns.
    #[must_use]
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns.to_vec(),
            compiled: patterns.iter().map(|p| compile(p)).collect(),
        }
    }

    /// Returns the source patterns.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns `true` when no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Matches the request path against the list.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.compiled.is_empty() {
            return false;
        }
        let candidate = normalize_path(path);
        self.compiled.iter().any(|re| re.is_match(&candidate))
    }
}

/// Strips the leading `/`; the root path is kept as `/` so a literal `/`
/// pattern can match it.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn compile(pattern: &str) -> Regex {
    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    #[expect(clippy::expect_used, reason = "escaped pattern is always a valid regex")]
    let compiled = Regex::new(&format!("^{escaped}$")).expect("glob pattern compiles");
    compiled
}

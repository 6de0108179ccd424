use crate::resolver::errors::{ResolveError, Result};
use glob::{MatchOptions, Pattern};

/// One compiled include or exclude glob.
///
/// Patterns without a `/` are tested against the file name. Patterns with a
/// `/` are tested against the path relative to the source root, joined with
/// `/`. `*` and `?` never cross a separator; `**` as a whole component does.
#[derive(Debug, Clone)]
pub enum PatternMatcher {
    Any,
    Name(Pattern),
    Path(Pattern),
}

impl PatternMatcher {
    /// `None` and `""` compile to [`PatternMatcher::Any`].
    pub fn compile(pattern: Option<&str>) -> Result<Self> {
        let Some(raw) = pattern.filter(|p| !p.is_empty()) else {
            return Ok(PatternMatcher::Any);
        };

        let compiled = Pattern::new(raw).map_err(|source| ResolveError::InvalidPattern {
            pattern: raw.to_string(),
            source,
        })?;

        if raw.contains('/') {
            Ok(PatternMatcher::Path(compiled))
        } else {
            Ok(PatternMatcher::Name(compiled))
        }
    }

    pub fn matches(&self, name: &str, relative_path: &str, case_sensitive: bool) -> bool {
        let options = match_options(case_sensitive);
        match self {
            PatternMatcher::Any => true,
            PatternMatcher::Name(pattern) => pattern.matches_with(name, options),
            PatternMatcher::Path(pattern) => pattern.matches_with(relative_path, options),
        }
    }
}

fn match_options(case_sensitive: bool) -> MatchOptions {
    MatchOptions {
        case_sensitive,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

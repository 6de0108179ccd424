use crate::pattern::matcher::PatternMatcher;
use crate::resolver::errors::Result;

/// A list of patterns combined with OR.
///
/// `None` and empty entries carry no filter and are dropped at compile time.
/// A set left without patterns answers `default_when_empty`.
#[derive(Debug, Clone)]
pub struct PatternSet {
    matchers: Vec<PatternMatcher>,
    default_when_empty: bool,
    case_sensitive: bool,
}

impl PatternSet {
    pub fn compile<S: AsRef<str>>(
        patterns: &[Option<S>],
        default_when_empty: bool,
        case_sensitive: bool,
    ) -> Result<Self> {
        let matchers = patterns
            .iter()
            .filter_map(|p| p.as_ref().map(AsRef::<str>::as_ref))
            .filter(|p| !p.is_empty())
            .map(|p| PatternMatcher::compile(Some(p)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            matchers,
            default_when_empty,
            case_sensitive,
        })
    }

    /// Include side: an empty set keeps everything.
    pub fn include<S: AsRef<str>>(patterns: &[Option<S>], case_sensitive: bool) -> Result<Self> {
        Self::compile(patterns, true, case_sensitive)
    }

    /// Exclude side: an empty set drops nothing.
    pub fn exclude<S: AsRef<str>>(patterns: &[Option<S>], case_sensitive: bool) -> Result<Self> {
        Self::compile(patterns, false, case_sensitive)
    }

    pub fn matches_any(&self, name: &str, relative_path: &str) -> bool {
        if self.matchers.is_empty() {
            return self.default_when_empty;
        }
        self.matchers
            .iter()
            .any(|m| m.matches(name, relative_path, self.case_sensitive))
    }
}

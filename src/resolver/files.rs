use crate::pattern::PatternSet;
use crate::resolver::errors::{ResolveError, Result};
use crate::resolver::walker::{Candidate, DirectoryWalker};
use serde::Serialize;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Descend into symlinked directories. Each physical directory is still
    /// walked at most once.
    pub follow_links: bool,
    /// Match patterns case-sensitively. Turn off on case-insensitive hosts.
    pub case_sensitive: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            follow_links: true,
            case_sensitive: true,
        }
    }
}

/// A regular file that survived the include and exclude filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFile {
    /// Absolute path as reached from its source.
    pub path: PathBuf,
    pub name: String,
    pub relative_path: PathBuf,
}

impl ResolvedFile {
    fn from_candidate(candidate: Candidate, name: String) -> Result<Self> {
        let path = std::path::absolute(&candidate.path).map_err(|source| ResolveError::Io {
            path: candidate.path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            name,
            relative_path: candidate.relative_path,
        })
    }

    /// Key for deduplication: `..` and links resolved, so two spellings of
    /// one file collapse.
    fn identity(&self) -> PathBuf {
        self.path
            .canonicalize()
            .unwrap_or_else(|_| self.path.clone())
    }
}

/// Turns directory and file sources into one filtered, ordered file list.
///
/// Output order is source order, then walk order within each directory.
/// A file reached through more than one source is reported once, where it was
/// first seen. The resolver keeps no state between calls, so every
/// [`FileResolver::resolve`] reflects the filesystem at that moment.
///
/// Errors are fail-fast: a bad pattern is reported before anything is read,
/// and the first I/O failure aborts the call without partial results. Sources
/// that do not exist contribute nothing and are not errors.
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    sources: Vec<String>,
    includes: Vec<Option<String>>,
    excludes: Vec<Option<String>>,
    options: ResolverOptions,
}

impl FileResolver {
    pub fn new(
        sources: Vec<String>,
        includes: Vec<Option<String>>,
        excludes: Vec<Option<String>>,
    ) -> Self {
        Self {
            sources,
            includes,
            excludes,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolve(&self) -> Result<Vec<ResolvedFile>> {
        let include = PatternSet::include(&self.includes, self.options.case_sensitive)?;
        let exclude = PatternSet::exclude(&self.excludes, self.options.case_sensitive)?;
        let walker = DirectoryWalker::new(self.options.follow_links);

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for source in &self.sources {
            for candidate in candidates(source, &walker)? {
                let name = candidate.name();
                let relative = candidate.relative_str();

                if !include.matches_any(&name, &relative) {
                    continue;
                }
                if exclude.matches_any(&name, &relative) {
                    tracing::trace!(file = %relative, "excluded");
                    continue;
                }

                let file = ResolvedFile::from_candidate(candidate, name)?;
                if seen.insert(file.identity()) {
                    resolved.push(file);
                }
            }
        }

        tracing::debug!(
            sources = self.sources.len(),
            files = resolved.len(),
            "resolved files"
        );
        Ok(resolved)
    }
}

fn candidates(source: &str, walker: &DirectoryWalker) -> Result<Vec<Candidate>> {
    let path = Path::new(source);

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if is_absent(&e) => {
            tracing::debug!(source, error = %e, "source does not exist, skipping");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(ResolveError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    if metadata.is_dir() {
        walker.walk(path)
    } else if metadata.is_file() {
        Ok(vec![Candidate::single(path)])
    } else {
        tracing::debug!(source, "source is neither a file nor a directory, skipping");
        Ok(Vec::new())
    }
}

/// Lookups that mean "nothing there" rather than an access failure: a missing
/// entry, a path running through a regular file, or an unrepresentable path.
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory | io::ErrorKind::InvalidInput
    )
}

/// One-shot form of [`FileResolver::resolve`] with default options.
pub fn resolve_files(
    sources: Vec<String>,
    includes: Vec<Option<String>>,
    excludes: Vec<Option<String>>,
) -> Result<Vec<ResolvedFile>> {
    FileResolver::new(sources, includes, excludes).resolve()
}

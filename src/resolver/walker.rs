use crate::resolver::errors::{ResolveError, Result};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file found beneath a source, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Location below the source root; just the file name for file sources.
    pub relative_path: PathBuf,
}

impl Candidate {
    pub fn single(path: &Path) -> Self {
        let relative_path = path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf());
        Self {
            path: path.to_path_buf(),
            relative_path,
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Relative path with `/` separators, the form path patterns match against.
    pub fn relative_str(&self) -> String {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Depth-first walk yielding regular files, entries sorted by file name
/// within each directory.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryWalker {
    follow_links: bool,
}

impl DirectoryWalker {
    pub fn new(follow_links: bool) -> Self {
        Self { follow_links }
    }

    pub fn walk(&self, root: &Path) -> Result<Vec<Candidate>> {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "walk root is not a directory");
            return Ok(Vec::new());
        }

        // Canonical paths of directories already descended into.
        let mut visited = HashSet::new();
        if let Ok(canonical) = root.canonicalize() {
            visited.insert(canonical);
        }

        let entries = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| first_visit(entry, &mut visited));

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.loop_ancestor().is_some() => {
                    tracing::debug!(path = ?err.path(), "skipping symlink loop");
                    continue;
                }
                Err(err) if is_dangling(&err) => {
                    tracing::debug!(path = ?err.path(), "skipping dangling entry");
                    continue;
                }
                Err(source) => {
                    return Err(ResolveError::Walk {
                        root: root.to_path_buf(),
                        source,
                    })
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or_else(|_| entry.path())
                .to_path_buf();
            files.push(Candidate {
                path: entry.into_path(),
                relative_path,
            });
        }

        tracing::debug!(root = %root.display(), files = files.len(), "walked directory");
        Ok(files)
    }
}

impl Default for DirectoryWalker {
    fn default() -> Self {
        Self::new(true)
    }
}

fn first_visit(entry: &DirEntry, visited: &mut HashSet<PathBuf>) -> bool {
    if !entry.file_type().is_dir() {
        return true;
    }
    match entry.path().canonicalize() {
        Ok(canonical) => {
            let fresh = visited.insert(canonical);
            if !fresh {
                tracing::debug!(path = %entry.path().display(), "directory already walked");
            }
            fresh
        }
        Err(_) => true,
    }
}

fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    // Without link following, a link's own type is reported; check its target.
    entry.path_is_symlink() && entry.path().is_file()
}

fn is_dangling(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.properties"), "a=b\n").unwrap();
        fs::write(dir.path().join("file_01.txt"), "hello\n").unwrap();
        fs::write(dir.path().join("file_01.csv"), "a,b\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("file_02.csv"), "c,d\n").unwrap();
        dir
    }

    fn relative(files: &[Candidate]) -> Vec<String> {
        files.iter().map(Candidate::relative_str).collect()
    }

    #[test]
    fn test_walk_is_lexicographic_and_depth_first() {
        let dir = fixture();
        fs::create_dir(dir.path().join("a_dir")).unwrap();
        fs::write(dir.path().join("a_dir").join("z.txt"), "").unwrap();

        let files = DirectoryWalker::default().walk(dir.path()).unwrap();

        assert_eq!(
            relative(&files),
            vec![
                "a_dir/z.txt",
                "file_01.csv",
                "file_01.txt",
                "nested/file_02.csv",
                "test.properties",
            ]
        );
    }

    #[test]
    fn test_walk_skips_directories() {
        let dir = fixture();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let files = DirectoryWalker::default().walk(dir.path()).unwrap();

        assert_eq!(files.len(), 4);
        assert!(files.iter().all(|f| f.path.is_file()));
    }

    #[test]
    fn test_walk_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let files = DirectoryWalker::default()
            .walk(&dir.path().join("missing"))
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_walk_is_repeatable() {
        let dir = fixture();
        let walker = DirectoryWalker::default();
        assert_eq!(walker.walk(dir.path()).unwrap(), walker.walk(dir.path()).unwrap());
    }

    #[test]
    fn test_candidate_single_uses_file_name() {
        let candidate = Candidate::single(Path::new("some/dir/pom.xml"));
        assert_eq!(candidate.name(), "pom.xml");
        assert_eq!(candidate.relative_str(), "pom.xml");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_survives_symlink_loop() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("nested").join("back")).unwrap();

        let files = DirectoryWalker::new(true).walk(dir.path()).unwrap();

        assert_eq!(
            relative(&files),
            vec![
                "file_01.csv",
                "file_01.txt",
                "nested/file_02.csv",
                "test.properties",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_descends_physical_directory_once() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data").join("x.csv"), "").unwrap();
        std::os::unix::fs::symlink(dir.path().join("data"), dir.path().join("alias")).unwrap();

        let files = DirectoryWalker::new(true).walk(dir.path()).unwrap();

        assert_eq!(relative(&files), vec!["alias/x.csv"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_without_following_links() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data").join("x.csv"), "").unwrap();
        std::os::unix::fs::symlink(dir.path().join("data"), dir.path().join("alias")).unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("data").join("x.csv"),
            dir.path().join("link.csv"),
        )
        .unwrap();

        let files = DirectoryWalker::new(false).walk(dir.path()).unwrap();

        assert_eq!(relative(&files), vec!["data/x.csv", "link.csv"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_dangling_symlink() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let files = DirectoryWalker::new(true).walk(dir.path()).unwrap();

        assert_eq!(files.len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_unreadable_directory_is_error() {
        use assert_matches::assert_matches;
        use std::os::unix::fs::PermissionsExt;

        let dir = fixture();
        let locked = dir.path().join("nested");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let readable = fs::read_dir(&locked).is_ok();

        let result = DirectoryWalker::default().walk(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Privileged users read through mode 000.
        if readable {
            return;
        }
        assert_matches!(result, Err(ResolveError::Walk { .. }));
    }
}

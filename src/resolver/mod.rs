pub mod errors;
mod files;
pub mod walker;

pub use errors::{ResolveError, Result};
pub use files::{resolve_files, FileResolver, ResolvedFile, ResolverOptions};
pub use walker::{Candidate, DirectoryWalker};

pub mod pattern;
pub mod reporter;
pub mod resolver;

pub use pattern::{PatternMatcher, PatternSet};
pub use reporter::{formatter_for, OutputFormat, OutputFormatter};
pub use resolver::{
    resolve_files, DirectoryWalker, FileResolver, ResolveError, ResolvedFile, ResolverOptions,
};

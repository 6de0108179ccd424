pub mod matcher;
pub mod set;

pub use matcher::PatternMatcher;
pub use set::PatternSet;

pub mod extractor;
pub mod matcher;

pub use extractor::*;
pub use matcher::*;

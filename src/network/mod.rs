pub mod coordinator;
pub mod fetcher;

pub use coordinator::*;
pub use fetcher::*;

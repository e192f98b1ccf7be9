//! Fetches pages concurrently, harvests proxy config strings with per-category
//! regexes and groups them by protocol and by the countries named in each
//! config's display name.

pub mod aggregate;
pub mod config;
pub mod discovery;
pub mod error;
pub mod io;
pub mod models;
pub mod network;
pub mod pipeline;
pub mod utils;

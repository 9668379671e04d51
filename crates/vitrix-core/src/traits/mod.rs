//! Core traits defined in `vitrix-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;

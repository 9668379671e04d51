//! # vitrix-cache
//!
//! Cache provider for Vitrix. The only backend is an in-process
//! [moka](https://crates.io/crates/moka) cache with per-entry TTLs; callers
//! go through [`CacheManager`] so another backend can be slotted in behind
//! the [`CacheProvider`](vitrix_core::traits::cache::CacheProvider) trait.

pub mod keys;
pub mod memory;
pub mod provider;

pub use provider::CacheManager;

//! In-memory store implementations.
//!
//! Data lives for the lifetime of the process. Semantics match the
//! PostgreSQL repositories, including case-insensitive email lookup and
//! versioned receipt writes.

pub mod account;
pub mod message;

pub use account::MemoryAccountStore;
pub use message::MemoryMessageStore;

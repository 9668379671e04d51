//! PostgreSQL store implementations.

pub mod account;
pub mod message;

pub use account::AccountRepository;
pub use message::MessageRepository;

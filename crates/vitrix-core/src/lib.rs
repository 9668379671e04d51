//! # vitrix-core
//!
//! Core crate for the Vitrix notification service. Contains configuration
//! schemas, the unified error system, and the traits implemented by the
//! infrastructure crates.
//!
//! This crate has **no** internal dependencies on other Vitrix crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;

//! Convenience result type alias for Vitrix.

use crate::error::AppError;

/// A specialized `Result` type for Vitrix operations.
pub type AppResult<T> = Result<T, AppError>;

//! HTTP request handlers.

pub mod callable;
pub mod health;
pub mod notify;
pub mod receipts;

//! Notification delivery and read tracking.

pub mod aggregator;
pub mod directory;
pub mod dispatcher;
pub mod receipts;
pub mod resolver;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::aggregate;
pub use directory::AccountDirectory;
pub use dispatcher::NotificationDispatcher;
pub use receipts::{ReceiptReconciler, apply_open};
pub use resolver::RecipientResolver;
pub use service::{NotificationResult, NotificationService};

//! # vitrix-service
//!
//! Business logic for Vitrix notifications. [`NotificationService`]
//! orchestrates the recipient resolver, the fan-out dispatcher, the outcome
//! aggregator and the read-receipt reconciler.
//!
//! Services follow constructor injection; every dependency is supplied at
//! construction time behind an `Arc`.

pub mod notification;

pub use notification::{
    AccountDirectory, NotificationDispatcher, NotificationResult, NotificationService,
    ReceiptReconciler, RecipientResolver, aggregate,
};

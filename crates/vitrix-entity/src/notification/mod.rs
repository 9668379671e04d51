//! Transient notification dispatch types.
//!
//! None of these are persisted: a request is resolved into recipients,
//! fanned out into per-token outcomes, and reduced into a report within a
//! single dispatch call.

pub mod outcome;
pub mod recipient;
pub mod report;
pub mod request;
pub mod target;

pub use outcome::{DispatchOutcome, OutcomeStatus};
pub use recipient::Recipient;
pub use report::{DeliveryReport, OverallStatus};
pub use request::NotificationRequest;
pub use target::Target;

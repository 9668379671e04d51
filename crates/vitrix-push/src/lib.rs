//! # vitrix-push
//!
//! Outbound push delivery. [`payload`] builds the provider envelope for one
//! device token, [`gateway::PushGateway`] is the seam the dispatcher sends
//! through, and [`http::HttpPushGateway`] is the HTTP implementation.

pub mod error;
pub mod gateway;
pub mod http;
pub mod payload;

pub use error::PushError;
pub use gateway::PushGateway;
pub use http::HttpPushGateway;
pub use payload::PushMessage;

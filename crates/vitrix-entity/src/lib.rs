//! # vitrix-entity
//!
//! Domain entity models for Vitrix. Persisted entities derive
//! `sqlx::FromRow` where they map one-to-one onto a table; transient
//! dispatch types (requests, outcomes, reports) are plain serde structs.

pub mod account;
pub mod message;
pub mod notification;

//! Broadcast message entity and its read receipts.

pub mod model;
pub mod receipt;

pub use model::{Message, ReadSummary};
pub use receipt::{OpenType, ReadReceipt, ReceiptIdentity};

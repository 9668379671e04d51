//! Store abstractions for accounts and broadcast messages.

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use vitrix_core::result::AppResult;
use vitrix_entity::account::{Account, DeviceToken};
use vitrix_entity::message::{Message, ReadReceipt};

/// Accounts, their group memberships, and their device tokens.
#[async_trait]
pub trait AccountStore: Send + Sync + Debug + 'static {
    /// Find an account by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find an account by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Every account whose groups contain `group` exactly.
    async fn find_by_group(&self, group: &str) -> AppResult<Vec<Account>>;

    /// Every account.
    async fn find_all(&self) -> AppResult<Vec<Account>>;

    /// Active tokens belonging to any of `account_ids`.
    async fn active_tokens(&self, account_ids: &[Uuid]) -> AppResult<Vec<DeviceToken>>;

    /// Look up a token regardless of its state.
    async fn find_token(&self, token: &str) -> AppResult<Option<DeviceToken>>;

    /// Mark a token inactive. Returns `false` when it was unknown or already inactive.
    async fn deactivate_token(&self, token: &str) -> AppResult<bool>;

    /// Insert an account.
    async fn create_account(&self, account: &Account) -> AppResult<Account>;

    /// Insert or re-activate a token, reassigning it to `token.account_id`.
    async fn register_token(&self, token: &DeviceToken) -> AppResult<DeviceToken>;
}

/// Result of a versioned receipt write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptWrite {
    /// The write applied; carries the message at its new version.
    Updated(Message),
    /// The message changed since `expected_version` was read.
    Conflict,
    /// No message has that id.
    Missing,
}

/// Broadcast messages and their read receipts.
#[async_trait]
pub trait MessageStore: Send + Sync + Debug + 'static {
    /// Persist a new message.
    async fn create(&self, message: &Message) -> AppResult<Message>;

    /// Find a message by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Message>>;

    /// Most recent messages first.
    async fn find_recent(&self, limit: u32) -> AppResult<Vec<Message>>;

    /// Replace the receipt list if the stored version still equals
    /// `expected_version`, bumping the version on success.
    async fn replace_receipts(
        &self,
        id: Uuid,
        expected_version: i64,
        receipts: &[ReadReceipt],
    ) -> AppResult<ReceiptWrite>;
}

//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered account in the gym.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Email address; unique, compared case-insensitively.
    pub email: String,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Account role.
    pub role: UserRole,
    /// Names of the training groups this account belongs to.
    pub groups: Vec<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with the current timestamp.
    pub fn new(email: impl Into<String>, display_name: Option<String>, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            display_name,
            role,
            groups: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style helper adding a group membership.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Whether this account belongs to the named group.
    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Whether the account's email equals `email`, ignoring case.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_and_email_matching() {
        let account = Account::new("Ana@Gym.io", None, UserRole::Trainee).in_group("Morning Squad");
        assert!(account.is_member_of("Morning Squad"));
        assert!(!account.is_member_of("morning squad"));
        assert!(account.has_email(" ana@gym.io "));
    }
}

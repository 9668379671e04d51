//! Expands a target into concrete recipients.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use vitrix_core::{AppError, AppResult};
use vitrix_database::AccountStore;
use vitrix_entity::account::Account;
use vitrix_entity::notification::{Recipient, Target};

/// Resolves a [`Target`] into recipients with their active device tokens.
#[derive(Debug, Clone)]
pub struct RecipientResolver {
    accounts: Arc<dyn AccountStore>,
}

impl RecipientResolver {
    /// Create a resolver over an account store.
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Resolve a target.
    ///
    /// An individual is returned even with no active tokens; it only fails
    /// when no account has the email. Group and "all" targets skip staff
    /// and accounts without active tokens. Either way an empty result is
    /// [`ErrorKind::NoRecipients`](vitrix_core::ErrorKind::NoRecipients).
    pub async fn resolve(&self, target: &Target) -> AppResult<Vec<Recipient>> {
        let recipients = match target {
            Target::Individual { email } => {
                let account = self.accounts.find_by_email(email).await?.ok_or_else(|| {
                    AppError::no_recipients(format!("No account found for '{email}'"))
                })?;
                let mut tokens = self.tokens_by_account(&[account.id]).await?;
                let account_tokens = tokens.remove(&account.id).unwrap_or_default();
                vec![to_recipient(account, account_tokens)]
            }
            Target::Group { name } => {
                let members = self.accounts.find_by_group(name).await?;
                self.audience(members).await?
            }
            Target::All => {
                let everyone = self.accounts.find_all().await?;
                self.audience(everyone).await?
            }
        };

        if recipients.is_empty() {
            return Err(AppError::no_recipients(format!(
                "Target '{target}' has no recipients with active device tokens"
            )));
        }

        debug!(target = %target, recipients = recipients.len(), "Resolved recipients");
        Ok(recipients)
    }

    /// Non-staff accounts with at least one active token, once each.
    async fn audience(&self, accounts: Vec<Account>) -> AppResult<Vec<Recipient>> {
        let mut seen = HashSet::new();
        let audience: Vec<Account> = accounts
            .into_iter()
            .filter(|a| !a.role.is_staff())
            .filter(|a| seen.insert(a.id))
            .collect();

        let ids: Vec<Uuid> = audience.iter().map(|a| a.id).collect();
        let mut tokens = self.tokens_by_account(&ids).await?;

        Ok(audience
            .into_iter()
            .filter_map(|account| {
                let account_tokens = tokens.remove(&account.id)?;
                Some(to_recipient(account, account_tokens))
            })
            .collect())
    }

    /// Active tokens grouped by account; accounts without tokens are absent.
    async fn tokens_by_account(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<String>>> {
        let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
        for token in self.accounts.active_tokens(ids).await? {
            let entry = grouped.entry(token.account_id).or_default();
            if !entry.contains(&token.token) {
                entry.push(token.token);
            }
        }
        Ok(grouped)
    }
}

fn to_recipient(account: Account, tokens: Vec<String>) -> Recipient {
    Recipient {
        user_id: account.id,
        email: account.email,
        name: account.display_name,
        tokens,
    }
}

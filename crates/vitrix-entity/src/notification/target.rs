//! Notification target selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use vitrix_core::{AppError, AppResult};

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Target {
    /// A single account, looked up by email.
    Individual {
        /// Account email.
        email: String,
    },
    /// Every non-staff member of a training group.
    Group {
        /// Group name, matched exactly.
        name: String,
    },
    /// Every non-staff account.
    All,
}

impl Target {
    /// Build a target from loosely-typed request parts.
    ///
    /// `kind` is `"individual"`, `"group"` or `"all"`. Without a kind, an
    /// email selects an individual and a group name selects a group.
    pub fn from_parts(
        kind: Option<&str>,
        email: Option<&str>,
        group: Option<&str>,
    ) -> AppResult<Self> {
        let email = non_blank(email);
        let group = non_blank(group);

        match kind.map(|k| k.trim().to_lowercase()).as_deref() {
            Some("individual") => email
                .map(|email| Self::Individual { email })
                .ok_or_else(|| AppError::invalid_target("Individual target requires an email")),
            Some("group") => group
                .map(|name| Self::Group { name })
                .ok_or_else(|| AppError::invalid_target("Group target requires a group name")),
            Some("all") => Ok(Self::All),
            Some(other) => Err(AppError::invalid_target(format!(
                "Unknown target type '{other}'. Expected one of: individual, group, all"
            ))),
            None => match (email, group) {
                (Some(email), _) => Ok(Self::Individual { email }),
                (None, Some(name)) => Ok(Self::Group { name }),
                (None, None) => Err(AppError::invalid_target(
                    "A target email, group, or \"all\" is required",
                )),
            },
        }
    }

    /// Group and "all" targets are broadcasts; an individual is not.
    pub fn is_broadcast(&self) -> bool {
        !matches!(self, Self::Individual { .. })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual { email } => write!(f, "individual:{email}"),
            Self::Group { name } => write!(f, "group:{name}"),
            Self::All => f.write_str("all"),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

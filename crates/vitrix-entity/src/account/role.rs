//! Account role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles an account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Gym administrator.
    Admin,
    /// Coach managing trainees.
    Coach,
    /// Trainee; the audience of group notifications.
    Trainee,
}

impl UserRole {
    /// Staff accounts are never addressed by group or "all" broadcasts.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Coach)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coach => "coach",
            Self::Trainee => "trainee",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = vitrix_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "coach" => Ok(Self::Coach),
            "trainee" => Ok(Self::Trainee),
            _ => Err(vitrix_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, coach, trainee"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_roles() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Coach.is_staff());
        assert!(!UserRole::Trainee.is_staff());
    }

    #[test]
    fn from_str() {
        assert_eq!("COACH".parse::<UserRole>().unwrap(), UserRole::Coach);
        assert!("owner".parse::<UserRole>().is_err());
    }
}

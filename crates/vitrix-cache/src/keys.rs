//! Cache key builders.

/// Prefix applied to all Vitrix cache keys.
const PREFIX: &str = "vitrix";

/// Display name of a receipt identity (email or user id).
pub fn account_name(identity: &str) -> String {
    format!("{PREFIX}:account:name:{}", identity.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_keys_are_case_folded() {
        assert_eq!(
            account_name(" Ana@Gym.io "),
            "vitrix:account:name:ana@gym.io"
        );
        assert_eq!(account_name("u-42"), "vitrix:account:name:u-42");
    }
}

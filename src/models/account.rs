//! Account identity and server token construction.

use std::fmt;

/// A named account, optionally scoped to a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub pool: Option<String>,
}

impl Account {
    pub fn new(name: impl Into<String>, pool: Option<&str>) -> Self {
        Self {
            name: name.into(),
            pool: pool.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    /// Token addressing this account on a server: `pool/name` or `name`.
    ///
    /// Every request kind goes through here so that hash, key and rotation
    /// requests line up with each other.
    pub fn token(&self) -> String {
        token(self.pool.as_deref(), &self.name)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pool {
            Some(pool) => write!(f, "user {} within pool {}", self.name, pool),
            None => write!(f, "user {}", self.name),
        }
    }
}

pub fn token(pool: Option<&str>, name: &str) -> String {
    match pool {
        Some(pool) if !pool.is_empty() => format!("{}/{}", pool, name),
        _ => name.to_string(),
    }
}

/// Recover the account name from an enumerated token.
///
/// `None` for tokens that do not sit directly under `pool`; asking for them
/// as `pool/name` would address a different account.
pub fn name_from_token<'a>(pool: Option<&str>, token: &'a str) -> Option<&'a str> {
    let token = token.trim_matches('/');
    let name = match pool.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(pool) => token.strip_prefix(pool)?.strip_prefix('/')?,
        None => token,
    };
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_with_pool() {
        assert_eq!(token(Some("p"), "u"), "p/u");
        assert_eq!(Account::new("u", Some("p")).token(), "p/u");
    }

    #[test]
    fn test_token_without_pool() {
        assert_eq!(token(None, "u"), "u");
        assert_eq!(token(Some(""), "u"), "u");
        assert_eq!(Account::new("u", Some("")).token(), "u");
        assert_eq!(Account::new("u", None).pool, None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Account::new("alice", None).to_string(), "user alice");
        assert_eq!(
            Account::new("alice", Some("team1")).to_string(),
            "user alice within pool team1"
        );
    }

    #[test]
    fn test_name_from_token() {
        assert_eq!(name_from_token(Some("team1"), "team1/alice"), Some("alice"));
        assert_eq!(name_from_token(Some("team1"), "/team1/alice/"), Some("alice"));
        assert_eq!(name_from_token(Some("team1/"), "team1/alice"), Some("alice"));
        assert_eq!(name_from_token(None, "bob"), Some("bob"));
    }

    #[test]
    fn test_token_outside_pool_has_no_name() {
        assert_eq!(name_from_token(Some("team1"), "other/carol"), None);
        assert_eq!(name_from_token(Some("team1"), "team10/carol"), None);
        assert_eq!(name_from_token(Some("team1"), "team1/sub/dave"), None);
        assert_eq!(name_from_token(None, "team1/alice"), None);
        assert_eq!(name_from_token(Some("team1"), "team1/"), None);
    }
}

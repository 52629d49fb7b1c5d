//! Authentication types for JWT and login payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two independent credential stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Back-office user.
    User,
    /// Client that owns a warehouse.
    Client,
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Client => write!(f, "client"),
        }
    }
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: String,
    /// Account name.
    pub name: String,
    /// Which store the account lives in.
    pub kind: AccountKind,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Token ID.
    pub jti: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(
        account_id: i32,
        name: &str,
        kind: AccountKind,
        issuer: &str,
        audience: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: account_id.to_string(),
            name: name.to_string(),
            kind,
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID, if the subject is well formed.
    #[must_use]
    pub fn account_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Registration payload (users and clients).
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Account name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account ID.
    pub id: i32,
    /// Account name.
    pub name: String,
    /// Which store the account lives in.
    pub kind: AccountKind,
}

/// Login response with the issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed JWT.
    pub token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated account.
    pub account: AccountInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new() {
        let expires_at = Utc::now() + Duration::hours(24);
        let before = Utc::now().timestamp();
        let claims = Claims::new(5, "ana", AccountKind::Client, "iss", "aud", expires_at);

        assert_eq!(claims.account_id(), Some(5));
        assert_eq!(claims.kind, AccountKind::Client);
        assert!(claims.iat >= before);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_account_kind_serde() {
        assert_eq!(
            serde_json::to_string(&AccountKind::User).unwrap(),
            "\"user\""
        );
        assert_eq!(AccountKind::Client.to_string(), "client");
    }

    #[test]
    fn test_malformed_subject() {
        let mut claims = Claims::new(1, "x", AccountKind::User, "i", "a", Utc::now());
        claims.sub = "abc".to_string();
        assert_eq!(claims.account_id(), None);
    }
}

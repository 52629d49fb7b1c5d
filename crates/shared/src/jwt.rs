//! JWT token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::{AccountKind, Claims};
use crate::config::JwtConfig;

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token was issued for someone else.
    #[error("invalid token")]
    Invalid,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expires_hours", &self.config.expires_hours)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues an access token for an account.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue(&self, account_id: i32, name: &str, kind: AccountKind) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::hours(self.config.expires_hours);
        let claims = Claims::new(
            account_id,
            name,
            kind,
            &self.config.issuer,
            &self.config.audience,
            expires_at,
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::Invalid` if issuer or audience do not match.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_audience(&[self.config.audience.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer
                | jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::Invalid,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the token lifetime in seconds.
    #[must_use]
    pub const fn expires_in(&self) -> i64 {
        self.config.expires_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn test_issue_and_validate() {
        let service = create_test_service();
        let token = service.issue(12, "maria", AccountKind::User).unwrap();
        assert!(!token.is_empty());

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.account_id(), Some(12));
        assert_eq!(claims.name, "maria");
        assert_eq!(claims.kind, AccountKind::User);
        assert_eq!(claims.iss, "mazerp");
        assert_eq!(claims.aud, "mazerp-front");
    }

    #[test]
    fn test_expires_in_defaults_to_a_day() {
        assert_eq!(create_test_service().expires_in(), 86_400);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        let result = service.validate_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::DecodingError(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_test_service()
            .issue(1, "a", AccountKind::Client)
            .unwrap();
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let token = create_test_service()
            .issue(1, "a", AccountKind::Client)
            .unwrap();
        let other = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            audience: "someone-else".to_string(),
            ..JwtConfig::default()
        });
        assert!(matches!(other.validate_token(&token), Err(JwtError::Invalid)));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            expires_hours: -2,
            ..JwtConfig::default()
        });
        let token = service.issue(1, "a", AccountKind::User).unwrap();
        assert!(matches!(service.validate_token(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", create_test_service());
        assert!(debug.contains("[hidden]"));
        assert!(!debug.contains("test-secret-key-for-testing"));
    }
}

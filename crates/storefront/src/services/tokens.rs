//! Signed session tokens.
//!
//! Sessions are a pair of HS256 JWTs: a short-lived access token checked
//! on every authenticated request, and a longer-lived refresh token whose
//! current value is also stored on the user row. A token of one kind is
//! never accepted where the other is expected.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use volt_core::UserId;

/// Which of the two session tokens a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, sent on every authenticated request.
    Access,
    /// Long-lived, only exchanged for a new pair.
    Refresh,
}

/// JWT claims carried by both token kinds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID the token was issued to.
    pub sub: Uuid,
    /// Token kind, so the two cannot be swapped.
    pub typ: TokenKind,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Issues and verifies the session token pair.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl TokenService {
    /// Create a token service from the shared signing secret.
    #[must_use]
    pub fn new(
        secret: &SecretString,
        access_ttl: std::time::Duration,
        refresh_ttl: std::time::Duration,
    ) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: chrono::Duration::from_std(access_ttl)
                .unwrap_or_else(|_| chrono::Duration::minutes(15)),
            refresh_ttl: chrono::Duration::from_std(refresh_ttl)
                .unwrap_or_else(|_| chrono::Duration::days(7)),
        }
    }

    /// Issue an access token for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_access(&self, user_id: UserId) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(user_id, TokenKind::Access, self.access_ttl)
    }

    /// Issue a refresh token for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_refresh(&self, user_id: UserId) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_ttl)
    }

    fn issue(
        &self,
        user_id: UserId,
        typ: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_uuid(),
            typ,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a token's signature, expiry, and kind; return the subject.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, expired, signed with a
    /// different secret, or of the wrong kind.
    pub fn verify(
        &self,
        token: &str,
        expected: TokenKind,
    ) -> Result<UserId, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())?;

        if data.claims.typ != expected {
            return Err(ErrorKind::InvalidToken.into());
        }

        Ok(UserId::new(data.claims.sub))
    }

    /// How long issued access tokens live.
    #[must_use]
    pub const fn access_ttl(&self) -> chrono::Duration {
        self.access_ttl
    }

    /// How long issued refresh tokens live.
    #[must_use]
    pub const fn refresh_ttl(&self) -> chrono::Duration {
        self.refresh_ttl
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            &SecretString::from("test-secret-for-token-service-tests"),
            Duration::from_secs(900),
            Duration::from_secs(7 * 24 * 3600),
        )
    }

    #[test]
    fn test_round_trip_access_token() {
        let svc = service();
        let user_id = UserId::generate();

        let token = svc.issue_access(user_id).unwrap();
        let subject = svc.verify(&token, TokenKind::Access).unwrap();

        assert_eq!(subject, user_id);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let svc = service();
        let user_id = UserId::generate();

        let token = svc.issue_refresh(user_id).unwrap();
        assert!(svc.verify(&token, TokenKind::Access).is_err());
        assert!(svc.verify(&token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let other = TokenService::new(
            &SecretString::from("a-different-secret-entirely-here"),
            Duration::from_secs(900),
            Duration::from_secs(7 * 24 * 3600),
        );

        let token = svc.issue_access(UserId::generate()).unwrap();
        assert!(other.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = service();
        assert!(svc.verify("not-a-jwt", TokenKind::Access).is_err());
    }
}

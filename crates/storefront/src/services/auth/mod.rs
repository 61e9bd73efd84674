//! Authentication service.
//!
//! Password accounts with JWT sessions. Login and registration return a
//! token pair; the refresh token's current value is stored on the user
//! row, so issuing a new pair (or logging out) revokes the old one.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use subtle::ConstantTimeEq;

use volt_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;
use crate::services::tokens::{TokenKind, TokenService};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display name length.
const MIN_NAME_LENGTH: usize = 2;

/// A freshly issued access/refresh token pair.
pub struct SessionTokens {
    /// Short-lived access token.
    pub access: String,
    /// Long-lived refresh token, also persisted on the user row.
    pub refresh: String,
}

/// Authentication service.
///
/// Handles registration, login, session refresh, and logout.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new account and open a session for it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidName` or `AuthError::WeakPassword` if a
    /// field doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, SessionTokens), AuthError> {
        let email = Email::parse(email)?;
        let name = validate_name(name)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, Role::User)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let session = self.open_session(user.id).await?;
        Ok((user, session))
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(User, SessionTokens), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let session = self.open_session(user.id).await?;
        Ok((user, session))
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The presented token must verify and match the one stored on the
    /// user row; anything else ends the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token fails verification.
    /// Returns `AuthError::RevokedToken` if it was superseded or cleared.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(User, SessionTokens), AuthError> {
        let user_id = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| AuthError::InvalidToken)?;

        let stored = self
            .users
            .get_refresh_token(user_id)
            .await?
            .ok_or(AuthError::RevokedToken)?;

        if !bool::from(stored.as_bytes().ct_eq(refresh_token.as_bytes())) {
            return Err(AuthError::RevokedToken);
        }

        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let session = self.open_session(user.id).await?;
        Ok((user, session))
    }

    /// End the session by clearing the stored refresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database write fails.
    pub async fn logout(&self, user_id: UserId) -> Result<(), AuthError> {
        self.users.clear_refresh_token(user_id).await?;
        Ok(())
    }

    /// Resolve an access token to its account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token fails verification.
    /// Returns `AuthError::InvalidCredentials` if the account is gone.
    pub async fn authenticate(&self, access_token: &str) -> Result<User, AuthError> {
        let user_id = self
            .tokens
            .verify(access_token, TokenKind::Access)
            .map_err(|_| AuthError::InvalidToken)?;

        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Issue a token pair and persist the refresh half.
    async fn open_session(&self, user_id: UserId) -> Result<SessionTokens, AuthError> {
        let access = self.tokens.issue_access(user_id)?;
        let refresh = self.tokens.issue_refresh(user_id)?;

        self.users.set_refresh_token(user_id, &refresh).await?;

        Ok(SessionTokens { access, refresh })
    }
}

/// Validate and trim a display name.
fn validate_name(name: &str) -> Result<&str, AuthError> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(AuthError::InvalidName(format!(
            "name must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    Ok(name)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

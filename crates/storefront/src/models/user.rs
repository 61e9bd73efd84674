//! User domain types.
//!
//! These types represent validated domain objects separate from database
//! row types. The credential hash and refresh token never leave the db
//! layer attached to a `User`.

use chrono::{DateTime, Utc};

use volt_core::{Email, Role, UserId};
use volt_core::api::UserBody;

/// A storefront account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique per account.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

//! User record model and related functionality

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Engine-assigned user identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub phone: Option<i64>,
    pub admin: Option<bool>,
}

impl UserRecord {
    /// Whether the user is an administrator. An unset flag means no.
    pub fn is_admin(&self) -> bool {
        self.admin.unwrap_or(false)
    }

    /// Apply already validated changes to this record
    pub(crate) fn apply(&mut self, changes: &UpdateUserRecord) {
        if let Some(username) = &changes.username {
            self.username = username.clone();
        }
        if let Some(password) = &changes.password {
            self.password = password.clone();
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(admin) = changes.admin {
            self.admin = admin;
        }
    }
}

/// Validated creation payload
///
/// Only produced by [`crate::validation::UserCandidate::validate`], so every
/// value of this type satisfies the required-field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) phone: Option<i64>,
    pub(crate) admin: Option<bool>,
}

impl NewUserRecord {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn phone(&self) -> Option<i64> {
        self.phone
    }

    pub fn admin(&self) -> Option<bool> {
        self.admin
    }

    /// Build the stored representation once the engine has assigned an id
    pub(crate) fn into_record(self, id: UserId) -> UserRecord {
        UserRecord {
            id,
            username: self.username,
            password: self.password,
            phone: self.phone,
            admin: self.admin,
        }
    }
}

/// Validated update payload
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateUserRecord {
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) phone: Option<Option<i64>>,
    pub(crate) admin: Option<Option<bool>>,
}

impl UpdateUserRecord {
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn phone(&self) -> Option<Option<i64>> {
        self.phone
    }

    pub fn admin(&self) -> Option<Option<bool>> {
        self.admin
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.phone.is_none()
            && self.admin.is_none()
    }
}

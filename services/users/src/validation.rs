//! Input validation for user records
//!
//! Untrusted input enters the store as a [`UserCandidate`] (creation) or a
//! [`UserChanges`] (partial update). Both may be decoded from untyped JSON;
//! decoding checks JSON types strictly and never coerces, so `"phone": "123"`
//! is rejected rather than read as a number. `validate` then produces the
//! typed payloads the storage engines accept.

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::models::{NewUserRecord, UpdateUserRecord};

/// Why a candidate or change set was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{0} must not contain NUL characters")]
    NulCharacter(&'static str),

    #[error("user record must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Missing(field)
            | ValidationError::Empty(field)
            | ValidationError::NulCharacter(field) => Some(*field),
            ValidationError::WrongType { field, .. } => Some(*field),
            ValidationError::NotAnObject => None,
        }
    }
}

/// Validate username
///
/// Usernames are compared byte for byte; no trimming or case folding.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    validate_text("username", username)
}

/// Validate password
///
/// The password is opaque to the store and kept as provided.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    validate_text("password", password)
}

/// Text columns must be non-empty and free of U+0000, which PostgreSQL
/// cannot store in `TEXT`.
fn validate_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    if value.contains('\0') {
        return Err(ValidationError::NulCharacter(field));
    }

    Ok(())
}

/// Candidate record submitted for creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserCandidate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub phone: Option<i64>,
    pub admin: Option<bool>,
}

impl UserCandidate {
    /// Candidate with the two required fields set
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    pub fn with_phone(mut self, phone: i64) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Decode a candidate from untyped input
    ///
    /// `null` is treated as absent. Unknown keys are ignored.
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        let object = as_object(&value)?;

        Ok(Self {
            username: string_field(object, "username")?,
            password: string_field(object, "password")?,
            phone: integer_field(object, "phone")?,
            admin: bool_field(object, "admin")?,
        })
    }

    /// Check required fields and produce a creation payload
    pub fn validate(self) -> Result<NewUserRecord, ValidationError> {
        let username = self.username.ok_or(ValidationError::Missing("username"))?;
        validate_username(&username)?;

        let password = self.password.ok_or(ValidationError::Missing("password"))?;
        validate_password(&password)?;

        Ok(NewUserRecord {
            username,
            password,
            phone: self.phone,
            admin: self.admin,
        })
    }
}

/// Partial update submitted against an existing record
///
/// `username` and `password` can be changed but never removed. `phone` and
/// `admin` use `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<String>,
    pub phone: Option<Option<i64>>,
    pub admin: Option<Option<bool>>,
}

impl UserChanges {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn phone(mut self, phone: Option<i64>) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn admin(mut self, admin: Option<bool>) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Decode a change set from untyped input
    ///
    /// An omitted key leaves the field untouched. An explicit `null` clears
    /// `phone`/`admin` and is rejected for `username`/`password`.
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        let object = as_object(&value)?;

        for field in ["username", "password"] {
            if matches!(object.get(field), Some(Value::Null)) {
                return Err(ValidationError::Missing(field));
            }
        }

        Ok(Self {
            username: string_field(object, "username")?,
            password: string_field(object, "password")?,
            phone: object
                .contains_key("phone")
                .then(|| integer_field(object, "phone"))
                .transpose()?,
            admin: object
                .contains_key("admin")
                .then(|| bool_field(object, "admin"))
                .transpose()?,
        })
    }

    /// Check the fields being changed and produce an update payload
    pub fn validate(self) -> Result<UpdateUserRecord, ValidationError> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }

        Ok(UpdateUserRecord {
            username: self.username,
            password: self.password,
            phone: self.phone,
            admin: self.admin,
        })
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::NotAnObject)
}

fn string_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn integer_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, ValidationError> {
    let wrong_type = ValidationError::WrongType {
        field,
        expected: "an integer",
    };

    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => as_integer(n).map(Some).ok_or(wrong_type),
        Some(_) => Err(wrong_type),
    }
}

/// Read a JSON number as `i64`, accepting floats with no fractional part
/// such as `1.0`.
fn as_integer(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }

    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

fn bool_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<bool>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a boolean",
        }),
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Public view of a user account. The password hash is deliberately not a
/// field here; see [`StoredAccount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName", alias = "full_name")]
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

/// An account as held by the store, hash included. Only the credential
/// module ever sees one.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub account: UserAccount,
    pub password_hash: String,
}

impl fmt::Debug for StoredAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredAccount")
            .field("account", &self.account)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Insert payload handed to the store. Id and creation time are assigned by
/// the store.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: Username,
    pub email: EmailAddress,
    pub full_name: FullName,
    pub password_hash: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

/// Errors raised while validating registration fields
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountFieldError {
    #[error("username must be between 3 and 50 characters")]
    UsernameLength,

    #[error("email must be a valid email address")]
    InvalidEmail,

    #[error("full name must be between 2 and 100 characters")]
    FullNameLength,
}

/// Case-sensitive username, 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 50;

    pub fn new(username: impl Into<String>) -> Result<Self, AccountFieldError> {
        let username = username.into();
        let len = username.chars().count();

        if username.trim().is_empty() || !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(AccountFieldError::UsernameLength);
        }

        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("email pattern is valid")
});

/// Syntactically valid email address, stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub const MAX_LEN: usize = 254;

    pub fn new(email: impl Into<String>) -> Result<Self, AccountFieldError> {
        let email = email.into();

        if email.len() > Self::MAX_LEN || !EMAIL_PATTERN.is_match(&email) {
            return Err(AccountFieldError::InvalidEmail);
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display name of the account holder, 2-100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 100;

    pub fn new(full_name: impl Into<String>) -> Result<Self, AccountFieldError> {
        let full_name = full_name.into();
        let len = full_name.chars().count();

        if full_name.trim().is_empty() || !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(AccountFieldError::FullNameLength);
        }

        Ok(Self(full_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_value_object {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = AccountFieldError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }
    };
}

string_value_object!(Username);
string_value_object!(EmailAddress);
string_value_object!(FullName);

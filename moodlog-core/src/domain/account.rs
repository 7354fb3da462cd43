//! Account domain model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Display name every account starts with until the user picks one
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Image reference returned by profile reads when no picture was uploaded
pub const PLACEHOLDER_IMAGE_URL: &str = "/avatar-placeholder.svg";

/// Identifier of a registered account, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(AccountId)
    }
}

/// A profile picture held by the asset host
///
/// The URL and the public id only ever travel together, so an account
/// either has both or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub public_id: String,
}

/// A registered user
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    /// argon2 PHC string, never rendered
    pub password_hash: String,
    pub display_name: String,
    pub image: Option<ImageRef>,
    pub onboarding_required: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn profile(&self) -> Profile {
        Profile {
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            image_url: self
                .image
                .as_ref()
                .map(|img| img.url.clone())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        }
    }
}

/// Data needed to insert a new account row
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
}

/// Publicly visible part of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub email: String,
    pub image_url: String,
}

/// Email + password pair as submitted for registration or login
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Normalize the email and reject blank fields
    pub fn validate(self) -> Result<Self> {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(Error::invalid_input("email cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(Error::invalid_input("password cannot be empty"));
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

/// An uploaded file waiting to be sent to the asset host
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

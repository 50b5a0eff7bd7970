//! User account and profile models
//!
//! Every user carries a profile holding the address bills are sent to.
//! Email, first name and last name are mandatory for back-office accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// Billing details attached to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub billing_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,

    pub date_joined: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,

    pub profile: UserProfile,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Create a new active user
    pub fn new(
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        profile: UserProfile,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
            last_login: None,
            profile,
        }
    }

    /// "First Last", trimmed; empty when both names are blank
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Label used wherever a user is picked or shown next to a bill
    ///
    /// "Full Name (username)" when a full name exists and differs from the
    /// username, otherwise just the username.
    pub fn label(&self) -> String {
        let name = self.full_name();
        if !name.is_empty() && name != self.username {
            format!("{} ({})", name, self.username)
        } else {
            self.username.clone()
        }
    }

    /// Validate the user and its profile
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.username.trim().is_empty() {
            return Err(UserValidationError::EmptyField("username"));
        }
        if self.username.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidUsername(self.username.clone()));
        }
        if self.first_name.trim().is_empty() {
            return Err(UserValidationError::EmptyField("first name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(UserValidationError::EmptyField("last name"));
        }
        if self.email.trim().is_empty() {
            return Err(UserValidationError::EmptyField("email"));
        }
        if !is_plausible_email(&self.email) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }
        if self.profile.billing_address.trim().is_empty() {
            return Err(UserValidationError::EmptyField("billing address"));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyField(&'static str),
    InvalidUsername(String),
    InvalidEmail(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "User {} is required", field),
            Self::InvalidUsername(name) => {
                write!(f, "Username cannot contain whitespace: '{}'", name)
            }
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{}'", email),
        }
    }
}

impl std::error::Error for UserValidationError {}

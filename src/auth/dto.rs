use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::{error::AuthError, repo_types::User};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for signup and signin. Unknown fields are dropped.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl CredentialsRequest {
    /// Trims the email and checks both fields. Case is preserved.
    pub fn validated(mut self) -> Result<Self, AuthError> {
        self.email = self.email.trim().to_string();
        if !is_valid_email(&self.email) {
            return Err(AuthError::Invalid("Invalid email".into()));
        }
        if self.password.is_empty() {
            return Err(AuthError::Invalid("Password must not be empty".into()));
        }
        Ok(self)
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::auth::{
    repo::{DirectoryError, UserDirectory},
    repo_types::User,
};

/// In-process directory. Used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Mutex<Vec<User>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find(&self, email: &str) -> anyhow::Result<Vec<User>> {
        let users = self.users.lock().await;
        Ok(users.iter().filter(|u| u.email == email).cloned().collect())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, DirectoryError> {
        let mut users = self.users.lock().await;
        // uniqueness is re-checked under the lock
        if users.iter().any(|u| u.email == email) {
            return Err(DirectoryError::Duplicate);
        }
        let user = User {
            id: users.len() as i64 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

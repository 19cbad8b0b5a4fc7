use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::auth::{
    error::AuthError,
    password::{hash_password_async, verify_password_async},
    repo::UserDirectory,
    repo_types::User,
};

/// Signup and signin over a [`UserDirectory`]. Holds no state of its own.
#[derive(Clone)]
pub struct CredentialService {
    directory: Arc<dyn UserDirectory>,
}

impl CredentialService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Registers `email` with a freshly salted hash of `password`.
    #[instrument(skip_all)]
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let existing = self.directory.find(email).await?;
        if !existing.is_empty() {
            debug!("signup rejected: email in use");
            return Err(AuthError::EmailInUse);
        }

        let password_hash = hash_password_async(password.to_owned()).await?;

        // The directory rejects a concurrent signup that got past the check above.
        let user = self.directory.create(email, &password_hash).await?;
        debug!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Returns the user registered under `email` if `password` matches.
    #[instrument(skip_all)]
    pub async fn signin(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .directory
            .find(email)
            .await?
            .into_iter()
            .next()
            .ok_or(AuthError::UserNotFound)?;

        let ok = verify_password_async(password.to_owned(), user.password_hash.clone()).await?;
        if !ok {
            warn!(user_id = user.id, "signin rejected: bad password");
            return Err(AuthError::BadPassword);
        }

        debug!(user_id = user.id, "user signed in");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{memory::MemoryUserDirectory, repo::DirectoryError};
    use async_trait::async_trait;

    fn service() -> CredentialService {
        CredentialService::new(Arc::new(MemoryUserDirectory::new()))
    }

    #[tokio::test]
    async fn signup_stores_salted_and_hashed_password() {
        let svc = service();
        let user = svc.signup("asd@asd.com", "asdf").await.expect("signup");
        assert_eq!(user.email, "asd@asd.com");
        assert_ne!(user.password_hash, "asdf");
        let (salt, hash) = user.password_hash.split_once('.').expect("salt.hash");
        assert!(!salt.is_empty());
        assert!(!hash.is_empty());
        assert!(!hash.contains('.'));
    }

    #[tokio::test]
    async fn signup_with_email_in_use_fails() {
        let svc = service();
        svc.signup("asd@asd.com", "asdf").await.expect("first signup");
        let err = svc.signup("asd@asd.com", "other").await.unwrap_err();
        assert!(matches!(err, AuthError::EmailInUse));
        assert_eq!(err.to_string(), "email in use");
    }

    #[tokio::test]
    async fn signin_with_unused_email_fails() {
        let err = service().signin("asdda@asd.com", "asd").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert_eq!(err.to_string(), "user not found");
    }

    #[tokio::test]
    async fn signin_with_wrong_password_fails() {
        let svc = service();
        svc.signup("asfd@asd.com", "asdf").await.expect("signup");
        let err = svc.signin("asfd@asd.com", "password").await.unwrap_err();
        assert!(matches!(err, AuthError::BadPassword));
        assert_eq!(err.to_string(), "bad password");
    }

    #[tokio::test]
    async fn signin_with_correct_password_returns_user() {
        let svc = service();
        let created = svc.signup("aassssd@asd.com", "asdf").await.expect("signup");
        let user = svc.signin("aassssd@asd.com", "asdf").await.expect("signin");
        assert_eq!(user, created);
    }

    #[tokio::test]
    async fn same_password_different_emails_get_different_hashes() {
        let svc = service();
        let a = svc.signup("a@x.com", "pw").await.unwrap();
        let b = svc.signup("b@x.com", "pw").await.unwrap();
        assert_ne!(a.password_hash, b.password_hash);
        assert_ne!(
            a.password_hash.split_once('.').unwrap().0,
            b.password_hash.split_once('.').unwrap().0
        );
    }

    #[tokio::test]
    async fn full_scenario() {
        let svc = service();
        let user = svc.signup("a@x.com", "pw1").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(svc.signin("a@x.com", "pw1").await.unwrap(), user);
        assert!(matches!(
            svc.signin("a@x.com", "wrong").await,
            Err(AuthError::BadPassword)
        ));
        assert!(matches!(
            svc.signin("b@x.com", "pw1").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            svc.signup("a@x.com", "pw2").await,
            Err(AuthError::EmailInUse)
        ));
    }

    #[tokio::test]
    async fn concurrent_signups_admit_one_user() {
        let dir = Arc::new(MemoryUserDirectory::new());
        let svc = CredentialService::new(dir.clone());
        let (a, b) = tokio::join!(
            svc.signup("race@x.com", "pw1"),
            svc.signup("race@x.com", "pw2")
        );
        assert!(a.is_ok() ^ b.is_ok());
        let err = a.err().or(b.err()).unwrap();
        assert!(matches!(err, AuthError::EmailInUse));
        assert_eq!(dir.find("race@x.com").await.unwrap().len(), 1);
    }

    /// Returns every record twice and never stores anything.
    struct DuplicatingDirectory {
        first: User,
        second: User,
    }

    #[async_trait]
    impl UserDirectory for DuplicatingDirectory {
        async fn find(&self, _email: &str) -> anyhow::Result<Vec<User>> {
            Ok(vec![self.first.clone(), self.second.clone()])
        }

        async fn create(&self, _email: &str, _hash: &str) -> Result<User, DirectoryError> {
            Err(DirectoryError::Other(anyhow::anyhow!("read only")))
        }
    }

    #[tokio::test]
    async fn signin_uses_first_match() {
        let first = User {
            id: 7,
            email: "dup@x.com".into(),
            password_hash: crate::auth::password::hash_password("pw").unwrap(),
        };
        let second = User {
            id: 8,
            email: "dup@x.com".into(),
            password_hash: crate::auth::password::hash_password("other").unwrap(),
        };
        let svc = CredentialService::new(Arc::new(DuplicatingDirectory { first, second }));
        assert_eq!(svc.signin("dup@x.com", "pw").await.unwrap().id, 7);
        assert!(matches!(
            svc.signin("dup@x.com", "other").await,
            Err(AuthError::BadPassword)
        ));
    }

    #[tokio::test]
    async fn signin_with_malformed_stored_hash_is_bad_password() {
        let dir = Arc::new(MemoryUserDirectory::new());
        dir.create("legacy@x.com", "plaintext").await.unwrap();
        let svc = CredentialService::new(dir);
        assert!(matches!(
            svc.signin("legacy@x.com", "plaintext").await,
            Err(AuthError::BadPassword)
        ));
    }

    struct UnreachableDirectory;

    #[async_trait]
    impl UserDirectory for UnreachableDirectory {
        async fn find(&self, _email: &str) -> anyhow::Result<Vec<User>> {
            anyhow::bail!("connection refused")
        }

        async fn create(&self, _email: &str, _hash: &str) -> Result<User, DirectoryError> {
            Err(DirectoryError::Other(anyhow::anyhow!("connection refused")))
        }
    }

    #[tokio::test]
    async fn directory_failure_is_internal() {
        let svc = CredentialService::new(Arc::new(UnreachableDirectory));
        assert!(matches!(
            svc.signup("new@x.com", "pw").await,
            Err(AuthError::Internal(_))
        ));
        assert!(matches!(
            svc.signin("new@x.com", "pw").await,
            Err(AuthError::Internal(_))
        ));
    }
}

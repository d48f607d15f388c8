use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::storage::{self, KeyValueStore, USER_KEY};
use crate::types::{Role, User};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateUser(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Capability check standing in front of the admin views.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> std::result::Result<User, AuthError>;

    async fn register(&self, signup: &Signup) -> std::result::Result<User, AuthError>;
}

struct Account {
    user: User,
    digest: [u8; 32],
}

/// In-process user directory. Only credential digests are kept.
#[derive(Default)]
pub struct DirectoryAuthenticator {
    accounts: RwLock<HashMap<String, Account>>,
}

impl DirectoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account directly, bypassing the duplicate check.
    pub async fn with_account(self, user: User, password: &str) -> Self {
        let digest = credential_digest(&user.email, password);
        self.accounts
            .write()
            .await
            .insert(user.email.clone(), Account { user, digest });
        self
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn credential_digest(email: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

#[async_trait]
impl Authenticator for DirectoryAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> std::result::Result<User, AuthError> {
        let accounts = self.accounts.read().await;
        let digest = credential_digest(&credentials.email, &credentials.password);
        match accounts.get(&credentials.email) {
            Some(account) if account.digest == digest => {
                info!("User {} signed in", credentials.email);
                Ok(account.user.clone())
            }
            _ => {
                warn!("Failed sign-in for {}", credentials.email);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn register(&self, signup: &Signup) -> std::result::Result<User, AuthError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&signup.email) {
            return Err(AuthError::DuplicateUser(signup.email.clone()));
        }
        let user = User {
            id: format!("user-{}", accounts.len() + 1),
            email: signup.email.clone(),
            name: signup.name.clone(),
            role: Role::Viewer,
            avatar: Some(format!("https://i.pravatar.cc/150?u={}", signup.email)),
        };
        accounts.insert(
            signup.email.clone(),
            Account {
                user: user.clone(),
                digest: credential_digest(&signup.email, &signup.password),
            },
        );
        info!("Registered user {}", signup.email);
        Ok(user)
    }
}

pub async fn save_session(store: &dyn KeyValueStore, user: &User) -> Result<()> {
    storage::put_json(store, USER_KEY, user).await
}

/// The persisted user, if any. A corrupt record counts as signed out.
pub async fn load_session(store: &dyn KeyValueStore) -> Option<User> {
    match storage::get_json::<User>(store, USER_KEY).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Discarding unreadable session: {}", e);
            None
        }
    }
}

pub async fn clear_session(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(USER_KEY).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MapStore;

    fn admin() -> User {
        User {
            id: "1".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin User".to_string(),
            role: Role::Admin,
            avatar: None,
        }
    }

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_known_account() {
        let auth = DirectoryAuthenticator::new().with_account(admin(), "s3cret").await;
        let user = auth.authenticate(&creds("admin@example.com", "s3cret")).await.unwrap();
        assert_eq!(user, admin());

        let err = auth.authenticate(&creds("admin@example.com", "wrong")).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        let err = auth.authenticate(&creds("nobody@example.com", "s3cret")).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_register_then_sign_in() {
        let auth = DirectoryAuthenticator::new();
        let signup = Signup {
            email: "ed@example.com".to_string(),
            password: "pw".to_string(),
            name: "Ed".to_string(),
        };
        let user = auth.register(&signup).await.unwrap();
        assert_eq!(user.role, Role::Viewer);
        assert_eq!(auth.register(&signup).await.unwrap_err(), AuthError::DuplicateUser("ed@example.com".to_string()));
        assert_eq!(auth.authenticate(&creds("ed@example.com", "pw")).await.unwrap(), user);
        assert_eq!(auth.len().await, 1);
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let store = MapStore::default();
        assert_eq!(load_session(&store).await, None);

        save_session(&store, &admin()).await.unwrap();
        let raw = store.get(USER_KEY).await.unwrap().unwrap();
        assert!(!raw.contains("password"));
        assert_eq!(load_session(&store).await, Some(admin()));

        clear_session(&store).await.unwrap();
        assert_eq!(load_session(&store).await, None);
    }

    #[tokio::test]
    async fn test_corrupt_session_is_signed_out() {
        let store = MapStore::default();
        store.set(USER_KEY, "{\"id\":").await.unwrap();
        assert_eq!(load_session(&store).await, None);
    }
}

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::users::password::PasswordHasher;
use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Validated registration input, as handed over by the endpoint.
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

/// Orchestrates registration: uniqueness check, password hashing, store call.
/// Collaborators are passed in at construction; there is no global registry.
pub struct RegistrationService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Hash the password, persist the user, return the stored record with
    /// its assigned identifier. The plaintext never reaches the store.
    pub async fn register(&self, registration: Registration) -> Result<User, ApiError> {
        if self
            .store
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            warn!(username = %registration.username, "username already registered");
            return Err(ApiError::Conflict("Username already registered".into()));
        }

        let password_hash = self.hasher.hash(&registration.password)?;

        let user = self
            .store
            .save(NewUser {
                username: registration.username,
                email: registration.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.store.find_by_id(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory::InMemoryUserStore;
    use crate::users::password::Argon2Hasher;

    fn make_service() -> RegistrationService {
        let store = Arc::new(InMemoryUserStore::new()) as Arc<dyn UserStore>;
        let hasher = Arc::new(Argon2Hasher::new()) as Arc<dyn PasswordHasher>;
        RegistrationService::new(store, hasher)
    }

    fn registration(username: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: None,
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_assigns_id_and_hashes_password() {
        let service = make_service();

        let user = service
            .register(registration("alice", "secret123"))
            .await
            .expect("register");

        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "secret123");

        // The stored digest must verify against the original plaintext.
        let hasher = Argon2Hasher::new();
        assert!(hasher
            .verify("secret123", &user.password_hash)
            .expect("verify"));
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let service = make_service();

        service
            .register(registration("alice", "secret123"))
            .await
            .expect("first register");

        let err = service
            .register(registration("alice", "other-password"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn registered_user_is_findable() {
        let service = make_service();

        let user = service
            .register(registration("alice", "secret123"))
            .await
            .expect("register");

        let found = service.find(user.id).await.expect("find");
        assert_eq!(found.expect("present").id, user.id);
    }

    #[tokio::test]
    async fn concurrent_registrations_get_distinct_ids() {
        let store = Arc::new(InMemoryUserStore::new()) as Arc<dyn UserStore>;
        let hasher = Arc::new(Argon2Hasher::new()) as Arc<dyn PasswordHasher>;
        let service = Arc::new(RegistrationService::new(store, hasher));

        let a = {
            let service = service.clone();
            tokio::spawn(
                async move { service.register(registration("alice", "secret123")).await },
            )
        };
        let b = {
            let service = service.clone();
            tokio::spawn(async move { service.register(registration("bob", "hunter2hunter2")).await })
        };

        let alice = a.await.expect("join").expect("register alice");
        let bob = b.await.expect("join").expect("register bob");
        assert_ne!(alice.id, bob.id);
    }

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
    }
}

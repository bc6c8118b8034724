//! In-process authentication provider.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use super::AuthProvider;
use crate::error::{BookingError, BookingResult};
use crate::generate_id;
use crate::model::{AuthIdentity, Credentials};

struct Account {
    password: String,
    identity: AuthIdentity,
}

/// Email/password accounts held in memory, one signed-in user at a time.
///
/// Passwords are kept as given; this provider exists for tests and demos and
/// must not hold real credentials.
#[derive(Default)]
pub struct MemoryAuth {
    accounts: DashMap<String, Account>,
    current: RwLock<Option<AuthIdentity>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn rejected() -> BookingError {
        BookingError::Authentication {
            reason: "invalid email or password".into(),
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn create_user(&self, credentials: &Credentials) -> BookingResult<AuthIdentity> {
        let key = Self::key(&credentials.email);
        let identity = {
            let entry = self.accounts.entry(key.clone());
            if matches!(entry, dashmap::mapref::entry::Entry::Occupied(_)) {
                return Err(BookingError::Authentication {
                    reason: format!("email {key} is already in use"),
                });
            }
            let identity = AuthIdentity {
                uid: generate_id(),
                display_name: None,
                email: Some(key),
                photo_url: None,
            };
            entry.or_insert(Account {
                password: credentials.password.clone(),
                identity: identity.clone(),
            });
            identity
        };
        *self.current.write().await = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_in(&self, credentials: &Credentials) -> BookingResult<AuthIdentity> {
        let identity = {
            let account = self
                .accounts
                .get(&Self::key(&credentials.email))
                .ok_or_else(Self::rejected)?;
            if account.password != credentials.password {
                return Err(Self::rejected());
            }
            account.identity.clone()
        };
        *self.current.write().await = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> BookingResult<()> {
        *self.current.write().await = None;
        Ok(())
    }

    async fn current_user(&self) -> Option<AuthIdentity> {
        self.current.read().await.clone()
    }

    async fn update_profile(&self, uid: &str, display_name: &str) -> BookingResult<AuthIdentity> {
        let identity = {
            let mut account = self
                .accounts
                .iter_mut()
                .find(|a| a.identity.uid == uid)
                .ok_or_else(|| BookingError::not_found("User", uid))?;
            account.identity.display_name = Some(display_name.to_string());
            account.identity.clone()
        };
        let mut current = self.current.write().await;
        if current.as_ref().is_some_and(|c| c.uid == uid) {
            *current = Some(identity.clone());
        }
        Ok(identity)
    }
}

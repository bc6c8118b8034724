//! Sign-up, sign-in and user profiles.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::USERS;
use crate::error::{BookingError, BookingResult};
use crate::model::{AuthIdentity, Credentials, SignUpForm, UserPatch, UserProfile};
use crate::store::{AuthProvider, DocumentStore};

pub struct AccountService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
}

impl AccountService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    /// Registers the account, names it and writes its profile document.
    pub async fn sign_up(&self, form: &SignUpForm) -> BookingResult<UserProfile> {
        form.validate()?;
        let created = self.auth.create_user(&form.credentials()).await?;
        let identity = self
            .auth
            .update_profile(&created.uid, form.display_name.trim())
            .await?;

        let profile = UserProfile::from_identity(&identity, Utc::now());
        self.store
            .set(USERS, &profile.uid, serde_json::to_value(&profile)?)
            .await?;
        info!(uid = %profile.uid, "account created");
        Ok(profile)
    }

    /// Signs in and makes sure the user has a profile document.
    pub async fn sign_in(&self, credentials: &Credentials) -> BookingResult<UserProfile> {
        let identity = self.auth.sign_in(credentials).await.map_err(|e| {
            warn!(error = %e, "sign-in failed");
            e
        })?;
        self.ensure_user_document(&identity).await
    }

    pub async fn sign_out(&self) -> BookingResult<()> {
        self.auth.sign_out().await?;
        debug!("signed out");
        Ok(())
    }

    pub async fn current_user(&self) -> Option<AuthIdentity> {
        self.auth.current_user().await
    }

    pub async fn current_profile(&self) -> BookingResult<UserProfile> {
        let identity = self.auth.current_user().await.ok_or_else(|| {
            BookingError::Authentication {
                reason: "not signed in".into(),
            }
        })?;
        self.get_user(&identity.uid).await
    }

    /// Returns the stored profile, creating it from `identity` on first login.
    pub async fn ensure_user_document(&self, identity: &AuthIdentity) -> BookingResult<UserProfile> {
        if let Some(doc) = self.store.get(USERS, &identity.uid).await? {
            return doc.decode();
        }
        let profile = UserProfile::from_identity(identity, Utc::now());
        self.store
            .set(USERS, &profile.uid, serde_json::to_value(&profile)?)
            .await?;
        info!(uid = %profile.uid, "user document created");
        Ok(profile)
    }

    pub async fn get_user(&self, uid: &str) -> BookingResult<UserProfile> {
        if uid.trim().is_empty() {
            return Err(BookingError::validation("User id is required"));
        }
        self.store
            .get(USERS, uid)
            .await?
            .ok_or_else(|| BookingError::not_found("User", uid))?
            .decode()
    }

    /// Applies `patch` to the profile and returns the updated document.
    pub async fn update_user(&self, uid: &str, patch: &UserPatch) -> BookingResult<UserProfile> {
        patch.validate()?;
        if uid.trim().is_empty() {
            return Err(BookingError::validation("User id is required"));
        }
        self.store
            .update(USERS, uid, serde_json::to_value(patch)?)
            .await?;
        info!(uid, "profile updated");
        self.get_user(uid).await
    }

    /// Updates the signed-in user's profile, keeping the identity's display
    /// name in step.
    pub async fn update_my_profile(&self, patch: &UserPatch) -> BookingResult<UserProfile> {
        let identity = self.auth.current_user().await.ok_or_else(|| {
            BookingError::Authentication {
                reason: "not signed in".into(),
            }
        })?;
        let profile = self.update_user(&identity.uid, patch).await?;
        if let Some(name) = &patch.display_name {
            self.auth.update_profile(&identity.uid, name.trim()).await?;
        }
        Ok(profile)
    }

    /// Every profile, ordered by display name.
    pub async fn list_users(&self) -> BookingResult<Vec<UserProfile>> {
        let mut users = self
            .store
            .query(USERS, &[])
            .await?
            .into_iter()
            .map(|doc| doc.decode::<UserProfile>())
            .collect::<BookingResult<Vec<_>>>()?;
        users.sort_by(|a, b| a.display_name.cmp(&b.display_name).then_with(|| a.uid.cmp(&b.uid)));
        Ok(users)
    }
}

//! Active-identity session over the `currentUser` key.
//!
//! # Responsibility
//! - Resolve the viewer's identity and role for the moderation gate.
//! - Implement the dummy sign-in flow against the baseline user set.
//!
//! # Invariants
//! - A missing or malformed stored identity resolves to a signed-out
//!   viewer (`Guest`), never to an elevated role.

use crate::baseline::baseline_users;
use crate::error::{ForumError, ForumResult};
use crate::model::user::{Role, User};
use crate::store::{keys, Store, StoreResult};
use std::rc::Rc;
use uuid::Uuid;

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

pub struct Session {
    store: Rc<Store>,
}

impl Session {
    pub fn new(store: Rc<Store>) -> Self {
        Self { store }
    }

    /// Stored active identity, if any (fail-soft).
    pub fn current_user(&self) -> Option<User> {
        self.store.read(keys::CURRENT_USER)
    }

    /// Effective role for capability checks.
    ///
    /// Signed-out viewers resolve to `Guest`.
    pub fn role(&self) -> Role {
        self.current_user().map_or(Role::Guest, |user| user.role)
    }

    /// Signs in as the baseline user matching `email`.
    ///
    /// The dummy flow accepts any credentials: an unknown email falls
    /// back to the first baseline user.
    pub fn login(&self, email: &str) -> StoreResult<User> {
        let users = baseline_users();
        let user = users
            .iter()
            .find(|candidate| candidate.email == email)
            .or_else(|| users.first())
            .cloned()
            .expect("baseline user set is never empty");

        self.store.write(keys::CURRENT_USER, &user)?;
        log::info!(
            "event=session_login module=session status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Registers a new standard user and signs them in.
    pub fn register(&self, username: &str, email: &str) -> ForumResult<User> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(ForumError::Validation("username is required".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(ForumError::Validation(
                "a valid email address is required".to_string(),
            ));
        }

        let user = User::new(Uuid::new_v4().to_string(), username, email, Role::User);
        self.store.write(keys::CURRENT_USER, &user)?;
        Ok(user)
    }

    /// Clears the active identity.
    pub fn logout(&self) -> StoreResult<()> {
        self.store.remove(keys::CURRENT_USER)?;
        log::info!("event=session_logout module=session status=ok");
        Ok(())
    }

    /// Applies a partial profile update to the active identity.
    ///
    /// # Errors
    /// - `NotFound` when no identity is signed in.
    pub fn update_profile(&self, patch: ProfilePatch) -> ForumResult<User> {
        let Some(mut user) = self.current_user() else {
            return Err(ForumError::NotFound("active session".to_string()));
        };

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = Some(avatar);
        }

        self.store.write(keys::CURRENT_USER, &user)?;
        Ok(user)
    }
}

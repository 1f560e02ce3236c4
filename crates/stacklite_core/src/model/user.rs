//! Viewer identity model.
//!
//! # Invariants
//! - `role` is the single input to the moderation gate; a missing or
//!   unparseable stored identity must resolve to a signed-out viewer,
//!   never to an elevated role.

use crate::model::EntityId;
use serde::{Deserialize, Serialize};

/// Capability tier for the active identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Signed-out viewer; read-only access.
    Guest,
    /// Standard authenticated member.
    User,
    /// Elevated role with moderation rights.
    Admin,
}

/// Active identity persisted under the `currentUser` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(
        id: impl Into<EntityId>,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            role,
            avatar: None,
        }
    }
}

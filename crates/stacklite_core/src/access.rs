//! Capability table gating destructive and administrative mutations.
//!
//! # Responsibility
//! - Answer `has_capability(role, action)` over a fixed table.
//! - Fail closed when the actor's role cannot be resolved.
//!
//! # Invariants
//! - The table is total: every `(role, action)` pair has an answer.
//! - Denial carries no partial state change; callers check before
//!   mutating.

use crate::model::user::Role;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Named permission checked before a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Post,
    Vote,
    Comment,
    EditOwn,
    Moderate,
}

impl Action {
    /// Stable string id used in log events and user-facing denials.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Post => "post",
            Self::Vote => "vote",
            Self::Comment => "comment",
            Self::EditOwn => "edit-own",
            Self::Moderate => "moderate",
        }
    }
}

/// Fixed capability table.
///
/// Guests may only view; standard users may view, post, vote, comment
/// and edit their own content; admins may perform every action.
pub fn has_capability(role: Role, action: Action) -> bool {
    match role {
        Role::Admin => true,
        Role::User => !matches!(action, Action::Moderate),
        Role::Guest => matches!(action, Action::View),
    }
}

/// Gate entry point for mutation paths.
///
/// An unresolved role (`None`) denies every action, including `View`.
pub fn require(role: Option<Role>, action: Action) -> Result<(), PermissionDenied> {
    match role {
        Some(role) if has_capability(role, action) => Ok(()),
        _ => {
            log::warn!(
                "event=capability_denied module=access status=denied role={} action={}",
                role.map_or("unresolved", role_label),
                action.as_str()
            );
            Err(PermissionDenied { role, action })
        }
    }
}

/// Resolves the role of an optional actor for gate checks.
pub fn role_of(actor: Option<&crate::model::user::User>) -> Option<Role> {
    actor.map(|user| user.role)
}

/// Gate plus identity resolution for paths that need the actor itself.
///
/// A missing actor is denied like any unresolved role; on success the
/// caller gets the resolved identity without a separate unwrap.
pub fn require_actor<'a>(
    actor: Option<&'a crate::model::user::User>,
    action: Action,
) -> Result<&'a crate::model::user::User, PermissionDenied> {
    require(role_of(actor), action)?;
    actor.ok_or(PermissionDenied { role: None, action })
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Guest => "guest",
        Role::User => "user",
        Role::Admin => "admin",
    }
}

/// Capability gate rejection; surfaced as a user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDenied {
    pub role: Option<Role>,
    pub action: Action,
}

impl Display for PermissionDenied {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.role {
            Some(role) => write!(
                f,
                "role `{}` is not allowed to {}",
                role_label(role),
                self.action.as_str()
            ),
            None => write!(
                f,
                "action `{}` requires a resolved identity",
                self.action.as_str()
            ),
        }
    }
}

impl Error for PermissionDenied {}

#[cfg(test)]
mod tests {
    use super::{has_capability, require, Action, PermissionDenied};
    use crate::model::user::Role;

    #[test]
    fn guests_may_only_view() {
        assert!(has_capability(Role::Guest, Action::View));
        for action in [
            Action::Post,
            Action::Vote,
            Action::Comment,
            Action::EditOwn,
            Action::Moderate,
        ] {
            assert!(!has_capability(Role::Guest, action));
        }
    }

    #[test]
    fn standard_users_get_everything_but_moderate() {
        for action in [
            Action::View,
            Action::Post,
            Action::Vote,
            Action::Comment,
            Action::EditOwn,
        ] {
            assert!(has_capability(Role::User, action));
        }
        assert!(!has_capability(Role::User, Action::Moderate));
    }

    #[test]
    fn admins_may_do_everything() {
        for action in [
            Action::View,
            Action::Post,
            Action::Vote,
            Action::Comment,
            Action::EditOwn,
            Action::Moderate,
        ] {
            assert!(has_capability(Role::Admin, action));
        }
    }

    #[test]
    fn unresolved_role_fails_closed() {
        let err = require(None, Action::View).expect_err("unresolved role must be denied");
        assert_eq!(
            err,
            PermissionDenied {
                role: None,
                action: Action::View
            }
        );
    }

    #[test]
    fn require_actor_resolves_identity_and_gate_together() {
        use super::require_actor;
        use crate::model::user::User;

        let err = require_actor(None, Action::Post).expect_err("missing actor is denied");
        assert_eq!(err.role, None);

        let guest = User::new("9", "Window Shopper", "guest@example.com", Role::Guest);
        require_actor(Some(&guest), Action::Post).expect_err("guests cannot post");

        let poster = User::new("2", "Regular User", "user@user.com", Role::User);
        let resolved = require_actor(Some(&poster), Action::Post).expect("standard user posts");
        assert_eq!(resolved.id, poster.id);
    }
}

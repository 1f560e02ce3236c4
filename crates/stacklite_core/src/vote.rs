//! Tri-state vote engine.
//!
//! # Responsibility
//! - Compute vote transitions as a pure map from
//!   `(current state, requested direction)` to `(next state, score delta)`.
//! - Gate every vote behind an authenticated, vote-capable identity.
//!
//! # Invariants
//! - A rejected vote leaves both score and state untouched.
//! - Applying `score_delta` and re-deriving the viewer contribution from
//!   `next_state` must always agree.

use crate::access::{self, Action, PermissionDenied};
use crate::model::user::Role;
use serde::{Deserialize, Serialize};

/// Viewer's relationship to one votable entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    #[default]
    None,
    Up,
    Down,
}

impl VoteState {
    /// The viewer's contribution to a displayed score.
    pub fn contribution(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

/// Requested vote direction from a UI action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

/// Result of one vote transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub next_state: VoteState,
    pub score_delta: i64,
}

/// Pure transition table for the tri-state vote machine.
///
/// - cast: `None -> Up` (+1), `None -> Down` (-1)
/// - retract: `Up -> None` (-1), `Down -> None` (+1)
/// - swing: `Up -> Down` (-2), `Down -> Up` (+2)
pub fn apply_vote(current: VoteState, requested: VoteDirection) -> VoteOutcome {
    let (next_state, score_delta) = match (current, requested) {
        (VoteState::None, VoteDirection::Up) => (VoteState::Up, 1),
        (VoteState::None, VoteDirection::Down) => (VoteState::Down, -1),
        (VoteState::Up, VoteDirection::Up) => (VoteState::None, -1),
        (VoteState::Down, VoteDirection::Down) => (VoteState::None, 1),
        (VoteState::Up, VoteDirection::Down) => (VoteState::Down, -2),
        (VoteState::Down, VoteDirection::Up) => (VoteState::Up, 2),
    };
    VoteOutcome {
        next_state,
        score_delta,
    }
}

/// Entity carrying a score and the viewer's vote marker.
pub trait Votable {
    fn score(&self) -> i64;
    fn set_score(&mut self, score: i64);
    fn viewer_vote(&self) -> VoteState;
    fn set_viewer_vote(&mut self, state: VoteState);
}

/// Applies one gated vote transition to `entity`.
///
/// The gate runs before the state machine; on denial the entity is not
/// touched.
///
/// # Errors
/// - `PermissionDenied` when `role` is unresolved or not vote-capable.
pub fn toggle_vote(
    entity: &mut dyn Votable,
    direction: VoteDirection,
    role: Option<Role>,
) -> Result<VoteOutcome, PermissionDenied> {
    access::require(role, Action::Vote)?;

    let outcome = apply_vote(entity.viewer_vote(), direction);
    entity.set_score(entity.score() + outcome.score_delta);
    entity.set_viewer_vote(outcome.next_state);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::{apply_vote, toggle_vote, VoteDirection, VoteState};
    use crate::model::user::Role;

    struct Plain {
        score: i64,
        vote: VoteState,
    }

    impl super::Votable for Plain {
        fn score(&self) -> i64 {
            self.score
        }
        fn set_score(&mut self, score: i64) {
            self.score = score;
        }
        fn viewer_vote(&self) -> VoteState {
            self.vote
        }
        fn set_viewer_vote(&mut self, state: VoteState) {
            self.vote = state;
        }
    }

    #[test]
    fn covers_all_six_transitions() {
        let cases = [
            (VoteState::None, VoteDirection::Up, VoteState::Up, 1),
            (VoteState::None, VoteDirection::Down, VoteState::Down, -1),
            (VoteState::Up, VoteDirection::Up, VoteState::None, -1),
            (VoteState::Down, VoteDirection::Down, VoteState::None, 1),
            (VoteState::Up, VoteDirection::Down, VoteState::Down, -2),
            (VoteState::Down, VoteDirection::Up, VoteState::Up, 2),
        ];
        for (current, requested, next, delta) in cases {
            let outcome = apply_vote(current, requested);
            assert_eq!(outcome.next_state, next);
            assert_eq!(outcome.score_delta, delta);
        }
    }

    #[test]
    fn toggle_applies_delta_and_marker_together() {
        let mut entity = Plain {
            score: 8,
            vote: VoteState::None,
        };
        let outcome = toggle_vote(&mut entity, VoteDirection::Up, Some(Role::User))
            .expect("standard user can vote");
        assert_eq!(outcome.next_state, VoteState::Up);
        assert_eq!(entity.score, 9);
        assert_eq!(entity.vote, VoteState::Up);
    }

    #[test]
    fn unauthenticated_vote_leaves_entity_untouched() {
        let mut entity = Plain {
            score: 8,
            vote: VoteState::Up,
        };
        toggle_vote(&mut entity, VoteDirection::Down, None)
            .expect_err("unresolved role must be rejected");
        toggle_vote(&mut entity, VoteDirection::Down, Some(Role::Guest))
            .expect_err("guests cannot vote");
        assert_eq!(entity.score, 8);
        assert_eq!(entity.vote, VoteState::Up);
    }
}

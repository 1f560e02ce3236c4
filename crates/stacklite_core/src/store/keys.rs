//! Namespaced key catalog for the durable store.
//!
//! # Invariants
//! - Keys are stable across releases; renaming a key orphans data.
//! - No two constants alias the same stored value.

use crate::model::EntityId;

/// Serialized active identity, or absent when signed out.
pub const CURRENT_USER: &str = "currentUser";
/// Ordered collection of per-day activity records.
pub const USER_ACTIVITIES: &str = "userActivities";
/// Locally authored questions, newest first.
pub const USER_QUESTIONS: &str = "userQuestions";
/// Transient ask-question draft.
pub const ASK_QUESTION_DRAFT: &str = "askQuestion_draft";
/// User preferences.
pub const USER_SETTINGS: &str = "userSettings";
/// Notification collection, newest first.
pub const NOTIFICATIONS: &str = "notifications";
/// Viewer vote markers for questions, keyed by question id.
pub const QUESTION_VOTES: &str = "questionVotes";

/// Answers for one question.
pub fn answers_key(question_id: &EntityId) -> String {
    format!("answers_{question_id}")
}

/// Viewer vote markers for one question's answers, keyed by answer id.
pub fn answer_votes_key(question_id: &EntityId) -> String {
    format!("answerVotes_{question_id}")
}

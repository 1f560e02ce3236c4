//! Authored content model: questions and answers.
//!
//! # Responsibility
//! - Define the persisted shapes for the `userQuestions` and
//!   `answers_<questionId>` collections.
//!
//! # Invariants
//! - `score` holds the contributions of all *other* voters; the viewer's
//!   own contribution is derived from the vote-marker maps at read time.
//! - `answer_count` is maintained by the answer submission path, not by
//!   readers.

use crate::model::EntityId;
use crate::vote::{VoteState, Votable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One question, locally authored or from the baseline dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: EntityId,
    pub title: String,
    pub body: String,
    pub tags: BTreeSet<String>,
    pub author_id: EntityId,
    pub score: i64,
    pub answer_count: u32,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
    /// Viewer's tri-state vote, rebuilt from the marker map on read.
    #[serde(default)]
    pub viewer_vote: VoteState,
}

impl Question {
    /// Creates a locally authored question with a generated id.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        tags: BTreeSet<String>,
        author_id: impl Into<EntityId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            tags,
            author_id: author_id.into(),
            score: 0,
            answer_count: 0,
            accepted: false,
            created_at,
            viewer_vote: VoteState::None,
        }
    }
}

impl Votable for Question {
    fn score(&self) -> i64 {
        self.score
    }

    fn set_score(&mut self, score: i64) {
        self.score = score;
    }

    fn viewer_vote(&self) -> VoteState {
        self.viewer_vote
    }

    fn set_viewer_vote(&mut self, state: VoteState) {
        self.viewer_vote = state;
    }
}

/// One answer attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: EntityId,
    pub question_id: EntityId,
    pub body: String,
    pub author_id: EntityId,
    pub score: i64,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub viewer_vote: VoteState,
}

impl Answer {
    /// Creates a locally authored answer with a generated id.
    pub fn new(
        question_id: impl Into<EntityId>,
        body: impl Into<String>,
        author_id: impl Into<EntityId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question_id: question_id.into(),
            body: body.into(),
            author_id: author_id.into(),
            score: 0,
            accepted: false,
            created_at,
            viewer_vote: VoteState::None,
        }
    }
}

impl Votable for Answer {
    fn score(&self) -> i64 {
        self.score
    }

    fn set_score(&mut self, score: i64) {
        self.score = score;
    }

    fn viewer_vote(&self) -> VoteState {
        self.viewer_vote
    }

    fn set_viewer_vote(&mut self, state: VoteState) {
        self.viewer_vote = state;
    }
}

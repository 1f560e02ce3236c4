//! Question authoring, listing and reconciliation.
//!
//! # Responsibility
//! - Merge locally authored questions with the immutable baseline
//!   dataset at read time; local wins on id collision.
//! - Run submissions as two-phase operations: stage the pending record
//!   for immediate display, commit to the store only when the simulated
//!   latency has elapsed.
//!
//! # Invariants
//! - An abandoned `PendingQuestion` (dropped before commit) leaves the
//!   store untouched.
//! - Vote markers live beside, not inside, the question records; the
//!   displayed score is re-derived on every read.

use crate::access::{self, role_of, Action};
use crate::activity::ActivityAggregator;
use crate::baseline::baseline_questions;
use crate::bus::{ContextBus, TOPIC_QUESTION_UPDATED};
use crate::error::{ForumError, ForumResult};
use crate::model::question::Question;
use crate::model::settings::QuestionDraft;
use crate::model::user::User;
use crate::model::EntityId;
use crate::notify::NotificationCenter;
use crate::store::{keys, Store, StoreResult};
use crate::vote::{toggle_vote, VoteDirection, VoteState};
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Maximum number of tags accepted on a question.
pub const MAX_TAGS: usize = 5;

/// Validated submission input for a new question.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

/// A staged question awaiting its commit.
///
/// Holds the fully computed record so a view can render it immediately;
/// dropping the value abandons the submission without touching the
/// store.
#[derive(Debug)]
pub struct PendingQuestion {
    question: Question,
}

impl PendingQuestion {
    /// The pending record, for optimistic display.
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Persists the staged question after the simulated latency.
    ///
    /// Prepends to `userQuestions`, records a question activity, clears
    /// the draft, and publishes `questionUpdated`.
    pub fn commit(self, service: &QuestionService) -> ForumResult<Question> {
        let mut local: Vec<Question> = service.store.read(keys::USER_QUESTIONS);
        local.insert(0, self.question.clone());
        service.store.write(keys::USER_QUESTIONS, &local)?;

        ActivityAggregator::new(Rc::clone(&service.store), Rc::clone(&service.bus))
            .record_now(crate::model::activity::ActivityKind::Question)?;
        service.store.remove(keys::ASK_QUESTION_DRAFT)?;

        log::info!(
            "event=question_committed module=question status=ok id={}",
            self.question.id
        );
        service
            .bus
            .publish(TOPIC_QUESTION_UPDATED, Some(&json!({ "id": self.question.id })));
        Ok(self.question)
    }
}

/// Question use-case service for one execution context.
pub struct QuestionService {
    store: Rc<Store>,
    bus: Rc<ContextBus>,
}

impl QuestionService {
    pub fn new(store: Rc<Store>, bus: Rc<ContextBus>) -> Self {
        Self { store, bus }
    }

    /// Locally authored questions followed by the baseline dataset.
    ///
    /// Baseline entries whose id collides with a local entry are
    /// suppressed; the viewer's vote markers are folded into
    /// `viewer_vote` and the displayed score.
    pub fn list_questions(&self) -> Vec<Question> {
        let markers: BTreeMap<EntityId, VoteState> = self.store.read(keys::QUESTION_VOTES);
        let local: Vec<Question> = self.store.read(keys::USER_QUESTIONS);
        let local_ids: BTreeSet<EntityId> =
            local.iter().map(|question| question.id.clone()).collect();

        local
            .into_iter()
            .chain(
                baseline_questions()
                    .into_iter()
                    .filter(|question| !local_ids.contains(&question.id)),
            )
            .map(|mut question| {
                if let Some(marker) = markers.get(&question.id) {
                    question.viewer_vote = *marker;
                    question.score += marker.contribution();
                }
                question
            })
            .collect()
    }

    /// One reconciled question by id.
    ///
    /// # Errors
    /// - `NotFound` when the id is absent after reconciliation.
    pub fn get_question(&self, id: &EntityId) -> ForumResult<Question> {
        self.list_questions()
            .into_iter()
            .find(|question| &question.id == id)
            .ok_or_else(|| ForumError::NotFound(format!("question {id}")))
    }

    /// Validates and stages a new question for two-phase submission.
    ///
    /// # Errors
    /// - `PermissionDenied` when the actor cannot post.
    /// - `Validation` on missing title/body or a bad tag count.
    pub fn stage_question(
        &self,
        actor: Option<&User>,
        input: NewQuestion,
    ) -> ForumResult<PendingQuestion> {
        let author = access::require_actor(actor, Action::Post)?;

        let title = input.title.trim();
        if title.is_empty() {
            return Err(ForumError::Validation("a title is required".to_string()));
        }
        let body = input.body.trim();
        if body.is_empty() {
            return Err(ForumError::Validation(
                "a description is required".to_string(),
            ));
        }
        let tags: BTreeSet<String> = input
            .tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();
        if tags.is_empty() || tags.len() > MAX_TAGS {
            return Err(ForumError::Validation(format!(
                "between 1 and {MAX_TAGS} tags are required"
            )));
        }

        Ok(PendingQuestion {
            question: Question::new(title, body, tags, author.id.clone(), Utc::now()),
        })
    }

    /// Deletes a locally authored question and its answers.
    ///
    /// Authors need `edit-own`; anyone else needs `moderate`. Baseline
    /// questions are immutable.
    pub fn delete_question(&self, actor: Option<&User>, id: &EntityId) -> ForumResult<()> {
        let mut local: Vec<Question> = self.store.read(keys::USER_QUESTIONS);
        let Some(target) = local.iter().find(|question| &question.id == id).cloned() else {
            if baseline_questions().iter().any(|question| &question.id == id) {
                return Err(ForumError::Validation(
                    "baseline content cannot be deleted".to_string(),
                ));
            }
            return Err(ForumError::NotFound(format!("question {id}")));
        };

        let required = match actor {
            Some(user) if user.id == target.author_id => Action::EditOwn,
            _ => Action::Moderate,
        };
        access::require(role_of(actor), required)?;

        local.retain(|question| &question.id != id);
        self.store.write(keys::USER_QUESTIONS, &local)?;
        self.store.remove(&keys::answers_key(id))?;
        self.store.remove(&keys::answer_votes_key(id))?;

        // A leftover marker would re-apply to a baseline question that
        // resurfaces under the same id.
        let mut markers: BTreeMap<EntityId, VoteState> = self.store.read(keys::QUESTION_VOTES);
        if markers.remove(id).is_some() {
            self.store.write(keys::QUESTION_VOTES, &markers)?;
        }

        log::info!(
            "event=question_deleted module=question status=ok id={id} action={}",
            required.as_str()
        );
        self.bus
            .publish(TOPIC_QUESTION_UPDATED, Some(&json!({ "id": id })));
        Ok(())
    }

    /// Applies one gated vote transition to a question.
    ///
    /// Persists only the viewer's marker; the score shown to the viewer
    /// is re-derived from base score plus marker on every read.
    pub fn vote_question(
        &self,
        actor: Option<&User>,
        id: &EntityId,
        direction: VoteDirection,
    ) -> ForumResult<Question> {
        let mut question = self.get_question(id)?;
        let outcome = toggle_vote(&mut question, direction, role_of(actor))?;

        let mut markers: BTreeMap<EntityId, VoteState> = self.store.read(keys::QUESTION_VOTES);
        if outcome.next_state == VoteState::None {
            markers.remove(id);
        } else {
            markers.insert(id.clone(), outcome.next_state);
        }
        self.store.write(keys::QUESTION_VOTES, &markers)?;

        NotificationCenter::new(Rc::clone(&self.store)).add(
            crate::model::notification::NotificationKind::Vote,
            "Vote recorded",
            format!("Your vote on \"{}\" has been recorded.", question.title),
            Some(id.clone()),
        )?;
        self.bus
            .publish(TOPIC_QUESTION_UPDATED, Some(&json!({ "id": id })));
        Ok(question)
    }

    /// Persists the ask-question draft; additive auto-save path.
    pub fn save_draft(&self, draft: &QuestionDraft) -> StoreResult<()> {
        self.store.write(keys::ASK_QUESTION_DRAFT, draft)
    }

    /// Current draft, empty when none was saved (fail-soft).
    pub fn load_draft(&self) -> QuestionDraft {
        self.store.read(keys::ASK_QUESTION_DRAFT)
    }

    /// Discards the draft.
    pub fn clear_draft(&self) -> StoreResult<()> {
        self.store.remove(keys::ASK_QUESTION_DRAFT)
    }
}

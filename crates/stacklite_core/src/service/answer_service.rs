//! Answer authoring, listing and acceptance.
//!
//! # Responsibility
//! - Resolve answers asymmetrically: locally authored questions read
//!   exclusively from local storage; baseline questions read the fixed
//!   baseline answer set (seeded for one id, otherwise empty).
//! - Run submissions as two-phase operations, like questions.
//!
//! # Invariants
//! - At most one answer per question is accepted.
//! - The baseline-answer asymmetry is a preserved limitation of the
//!   shipped fixture data; see `baseline`.

use crate::access::{self, role_of, Action};
use crate::activity::ActivityAggregator;
use crate::baseline::baseline_answers;
use crate::bus::{ContextBus, TOPIC_QUESTION_UPDATED};
use crate::error::{ForumError, ForumResult};
use crate::model::activity::ActivityKind;
use crate::model::notification::NotificationKind;
use crate::model::question::{Answer, Question};
use crate::model::user::User;
use crate::model::EntityId;
use crate::notify::NotificationCenter;
use crate::service::question_service::QuestionService;
use crate::store::{keys, Store};
use crate::vote::{toggle_vote, VoteDirection, VoteState};
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A staged answer awaiting its commit.
///
/// Dropping the value abandons the submission with no store mutation.
#[derive(Debug)]
pub struct PendingAnswer {
    answer: Answer,
}

impl PendingAnswer {
    /// The pending record, for optimistic display.
    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    /// Persists the staged answer after the simulated latency.
    ///
    /// Appends to `answers_<questionId>`, bumps the local question's
    /// answer count, records an answer activity, produces an `Answer`
    /// notification and publishes `questionUpdated`.
    pub fn commit(self, service: &AnswerService) -> ForumResult<Answer> {
        let question_id = self.answer.question_id.clone();
        let answers_key = keys::answers_key(&question_id);

        let mut answers: Vec<Answer> = service.store.read(&answers_key);
        answers.push(self.answer.clone());
        service.store.write(&answers_key, &answers)?;

        let mut local: Vec<Question> = service.store.read(keys::USER_QUESTIONS);
        if let Some(question) = local.iter_mut().find(|question| question.id == question_id) {
            question.answer_count += 1;
            service.store.write(keys::USER_QUESTIONS, &local)?;
        }

        ActivityAggregator::new(Rc::clone(&service.store), Rc::clone(&service.bus))
            .record_now(ActivityKind::Answer)?;
        NotificationCenter::new(Rc::clone(&service.store)).add(
            NotificationKind::Answer,
            "New Answer",
            "Your answer has been posted.",
            Some(question_id.clone()),
        )?;

        log::info!(
            "event=answer_committed module=answer status=ok id={} question_id={question_id}",
            self.answer.id
        );
        service
            .bus
            .publish(TOPIC_QUESTION_UPDATED, Some(&json!({ "id": question_id })));
        Ok(self.answer)
    }
}

/// Answer use-case service for one execution context.
pub struct AnswerService {
    store: Rc<Store>,
    bus: Rc<ContextBus>,
}

impl AnswerService {
    pub fn new(store: Rc<Store>, bus: Rc<ContextBus>) -> Self {
        Self { store, bus }
    }

    /// Answers for one question, accepted answer first.
    ///
    /// Local questions read exclusively from local storage; baseline
    /// questions read the fixed baseline set (empty for unseeded ids).
    pub fn list_answers(&self, question_id: &EntityId) -> Vec<Answer> {
        let markers: BTreeMap<EntityId, VoteState> =
            self.store.read(&keys::answer_votes_key(question_id));

        let mut answers: Vec<Answer> = if self.is_local_question(question_id) {
            self.store.read(&keys::answers_key(question_id))
        } else {
            baseline_answers(question_id)
        };

        for answer in &mut answers {
            if let Some(marker) = markers.get(&answer.id) {
                answer.viewer_vote = *marker;
                answer.score += marker.contribution();
            }
        }
        answers.sort_by_key(|answer| !answer.accepted);
        answers
    }

    /// Validates and stages a new answer for two-phase submission.
    ///
    /// # Errors
    /// - `NotFound` when the question is absent after reconciliation.
    /// - `PermissionDenied` when the actor cannot post.
    /// - `Validation` when the body is empty.
    pub fn stage_answer(
        &self,
        actor: Option<&User>,
        question_id: &EntityId,
        body: &str,
    ) -> ForumResult<PendingAnswer> {
        self.question_service().get_question(question_id)?;
        let author = access::require_actor(actor, Action::Post)?;

        let body = body.trim();
        if body.is_empty() {
            return Err(ForumError::Validation("an answer is required".to_string()));
        }

        Ok(PendingAnswer {
            answer: Answer::new(question_id.clone(), body, author.id.clone(), Utc::now()),
        })
    }

    /// Marks one answer accepted and clears every other acceptance.
    ///
    /// The question author needs `edit-own`; accepting on someone else's
    /// behalf needs `moderate`. Baseline content is immutable.
    pub fn accept_answer(
        &self,
        actor: Option<&User>,
        question_id: &EntityId,
        answer_id: &EntityId,
    ) -> ForumResult<()> {
        let mut local: Vec<Question> = self.store.read(keys::USER_QUESTIONS);
        let Some(question) = local.iter_mut().find(|question| &question.id == question_id)
        else {
            if self.question_service().get_question(question_id).is_ok() {
                return Err(ForumError::Validation(
                    "baseline content cannot be modified".to_string(),
                ));
            }
            return Err(ForumError::NotFound(format!("question {question_id}")));
        };

        let required = match actor {
            Some(user) if user.id == question.author_id => Action::EditOwn,
            _ => Action::Moderate,
        };
        access::require(role_of(actor), required)?;

        let answers_key = keys::answers_key(question_id);
        let mut answers: Vec<Answer> = self.store.read(&answers_key);
        if !answers.iter().any(|answer| &answer.id == answer_id) {
            return Err(ForumError::NotFound(format!("answer {answer_id}")));
        }
        for answer in &mut answers {
            answer.accepted = &answer.id == answer_id;
        }
        question.accepted = true;
        let question_title = question.title.clone();

        self.store.write(&answers_key, &answers)?;
        self.store.write(keys::USER_QUESTIONS, &local)?;

        NotificationCenter::new(Rc::clone(&self.store)).add(
            NotificationKind::Accepted,
            "Answer accepted",
            format!("An answer to \"{question_title}\" was marked as accepted."),
            Some(question_id.clone()),
        )?;
        log::info!(
            "event=answer_accepted module=answer status=ok question_id={question_id} answer_id={answer_id}"
        );
        self.bus
            .publish(TOPIC_QUESTION_UPDATED, Some(&json!({ "id": question_id })));
        Ok(())
    }

    /// Applies one gated vote transition to an answer.
    pub fn vote_answer(
        &self,
        actor: Option<&User>,
        question_id: &EntityId,
        answer_id: &EntityId,
        direction: VoteDirection,
    ) -> ForumResult<Answer> {
        let mut answer = self
            .list_answers(question_id)
            .into_iter()
            .find(|answer| &answer.id == answer_id)
            .ok_or_else(|| ForumError::NotFound(format!("answer {answer_id}")))?;

        let outcome = toggle_vote(&mut answer, direction, role_of(actor))?;

        let votes_key = keys::answer_votes_key(question_id);
        let mut markers: BTreeMap<EntityId, VoteState> = self.store.read(&votes_key);
        if outcome.next_state == VoteState::None {
            markers.remove(answer_id);
        } else {
            markers.insert(answer_id.clone(), outcome.next_state);
        }
        self.store.write(&votes_key, &markers)?;

        NotificationCenter::new(Rc::clone(&self.store)).add(
            NotificationKind::Vote,
            "Vote recorded",
            "Your vote on an answer has been recorded.",
            Some(question_id.clone()),
        )?;
        Ok(answer)
    }

    fn is_local_question(&self, question_id: &EntityId) -> bool {
        let local: Vec<Question> = self.store.read(keys::USER_QUESTIONS);
        local.iter().any(|question| &question.id == question_id)
    }

    fn question_service(&self) -> QuestionService {
        QuestionService::new(Rc::clone(&self.store), Rc::clone(&self.bus))
    }
}

#[cfg(test)]
mod tests {
    use super::AnswerService;
    use crate::bus::ContextBus;
    use crate::error::ForumError;
    use crate::model::user::{Role, User};
    use crate::service::question_service::{NewQuestion, QuestionService};
    use crate::store::Store;
    use std::rc::Rc;

    fn services() -> (QuestionService, AnswerService) {
        let store = Rc::new(Store::in_memory());
        let bus = Rc::new(ContextBus::new());
        (
            QuestionService::new(Rc::clone(&store), Rc::clone(&bus)),
            AnswerService::new(store, bus),
        )
    }

    fn poster() -> User {
        User::new("2", "Regular User", "user@user.com", Role::User)
    }

    fn local_question(questions: &QuestionService, author: &User) -> String {
        questions
            .stage_question(
                Some(author),
                NewQuestion {
                    title: "Local question".to_string(),
                    body: "Body".to_string(),
                    tags: vec!["local".to_string()],
                },
            )
            .expect("stage")
            .commit(questions)
            .expect("commit")
            .id
    }

    #[test]
    fn seeded_baseline_question_lists_fixture_answers() {
        let (_, answers) = services();
        let listed = answers.list_answers(&"1".to_string());
        assert_eq!(listed.len(), 2);
        assert!(listed[0].accepted, "accepted answer sorts first");
    }

    #[test]
    fn unseeded_baseline_questions_list_empty() {
        let (_, answers) = services();
        assert!(answers.list_answers(&"4".to_string()).is_empty());
    }

    #[test]
    fn local_question_answers_come_from_local_storage_only() {
        let (questions, answers) = services();
        let author = poster();
        let question_id = local_question(&questions, &author);

        assert!(answers.list_answers(&question_id).is_empty());

        answers
            .stage_answer(Some(&author), &question_id, "An answer.")
            .expect("stage")
            .commit(&answers)
            .expect("commit");

        let listed = answers.list_answers(&question_id);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].body, "An answer.");
    }

    #[test]
    fn commit_bumps_the_local_answer_count() {
        let (questions, answers) = services();
        let author = poster();
        let question_id = local_question(&questions, &author);

        answers
            .stage_answer(Some(&author), &question_id, "An answer.")
            .expect("stage")
            .commit(&answers)
            .expect("commit");

        let question = questions.get_question(&question_id).expect("question");
        assert_eq!(question.answer_count, 1);
    }

    #[test]
    fn abandoned_answer_staging_leaves_no_trace() {
        let (questions, answers) = services();
        let author = poster();
        let question_id = local_question(&questions, &author);

        {
            let _pending = answers
                .stage_answer(Some(&author), &question_id, "Never committed.")
                .expect("stage");
        }
        assert!(answers.list_answers(&question_id).is_empty());
    }

    #[test]
    fn answering_an_unknown_question_is_not_found() {
        let (_, answers) = services();
        let author = poster();
        assert!(matches!(
            answers.stage_answer(Some(&author), &"missing".to_string(), "body"),
            Err(ForumError::NotFound(_))
        ));
    }

    #[test]
    fn acceptance_is_exclusive_per_question() {
        let (questions, answers) = services();
        let author = poster();
        let question_id = local_question(&questions, &author);

        let first = answers
            .stage_answer(Some(&author), &question_id, "first")
            .expect("stage")
            .commit(&answers)
            .expect("commit");
        let second = answers
            .stage_answer(Some(&author), &question_id, "second")
            .expect("stage")
            .commit(&answers)
            .expect("commit");

        answers
            .accept_answer(Some(&author), &question_id, &first.id)
            .expect("accept first");
        answers
            .accept_answer(Some(&author), &question_id, &second.id)
            .expect("accept second");

        let listed = answers.list_answers(&question_id);
        let accepted: Vec<_> = listed.iter().filter(|answer| answer.accepted).collect();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].id, second.id);
        assert!(questions.get_question(&question_id).expect("question").accepted);
    }

    #[test]
    fn accepting_on_anothers_behalf_requires_moderate() {
        let (questions, answers) = services();
        let author = poster();
        let question_id = local_question(&questions, &author);
        let answer = answers
            .stage_answer(Some(&author), &question_id, "answer")
            .expect("stage")
            .commit(&answers)
            .expect("commit");

        let other = User::new("3", "Developer123", "dev@example.com", Role::User);
        assert!(matches!(
            answers.accept_answer(Some(&other), &question_id, &answer.id),
            Err(ForumError::PermissionDenied(_))
        ));

        let admin = User::new("1", "Admin User", "admin@admin.com", Role::Admin);
        answers
            .accept_answer(Some(&admin), &question_id, &answer.id)
            .expect("moderator accepts");
    }

    #[test]
    fn baseline_answers_cannot_be_accepted() {
        let (_, answers) = services();
        let admin = User::new("1", "Admin User", "admin@admin.com", Role::Admin);
        let err = answers
            .accept_answer(Some(&admin), &"1".to_string(), &"a2".to_string())
            .expect_err("baseline is immutable");
        assert!(matches!(err, ForumError::Validation(_)));
    }
}

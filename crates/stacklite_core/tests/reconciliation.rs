use chrono::Utc;
use stacklite_core::{
    ForumContext, ForumError, NotificationKind, Question, Role, User, VoteDirection, VoteState,
};
use std::collections::BTreeSet;

fn signed_in(context: &ForumContext, email: &str) -> User {
    context.session().login(email).expect("login")
}

#[test]
fn local_entry_suppresses_the_colliding_baseline_entry() {
    let context = ForumContext::in_memory();

    // A locally authored record carrying a baseline id, e.g. written by
    // an older build. Local wins at read time.
    let mut shadow = Question::new(
        "Local shadow of question 1",
        "Locally edited copy.",
        BTreeSet::from(["sql".to_string()]),
        "2",
        Utc::now(),
    );
    shadow.id = "1".to_string();
    context
        .store
        .write("userQuestions", &vec![shadow.clone()])
        .expect("seed local");

    let listed = context.questions().list_questions();
    let ones: Vec<_> = listed.iter().filter(|q| q.id == "1").collect();
    assert_eq!(ones.len(), 1);
    assert_eq!(ones[0].title, shadow.title);
}

#[test]
fn vote_marker_survives_re_reads_without_compounding() {
    let context = ForumContext::in_memory();
    let voter = signed_in(&context, "user@user.com");
    let questions = context.questions();

    let base = questions
        .get_question(&"2".to_string())
        .expect("baseline question")
        .score;

    let voted = questions
        .vote_question(Some(&voter), &"2".to_string(), VoteDirection::Up)
        .expect("upvote");
    assert_eq!(voted.score, base + 1);
    assert_eq!(voted.viewer_vote, VoteState::Up);

    // The displayed score is derived, not accumulated: any number of
    // re-reads yields the same value.
    for _ in 0..3 {
        let read = questions
            .get_question(&"2".to_string())
            .expect("baseline question");
        assert_eq!(read.score, base + 1);
        assert_eq!(read.viewer_vote, VoteState::Up);
    }
}

#[test]
fn retracting_a_vote_clears_the_marker() {
    let context = ForumContext::in_memory();
    let voter = signed_in(&context, "user@user.com");
    let questions = context.questions();

    let base = questions
        .get_question(&"3".to_string())
        .expect("baseline question")
        .score;

    questions
        .vote_question(Some(&voter), &"3".to_string(), VoteDirection::Down)
        .expect("downvote");
    let retracted = questions
        .vote_question(Some(&voter), &"3".to_string(), VoteDirection::Down)
        .expect("retract");

    assert_eq!(retracted.viewer_vote, VoteState::None);
    assert_eq!(retracted.score, base);
    assert_eq!(
        questions
            .get_question(&"3".to_string())
            .expect("baseline question")
            .score,
        base
    );
}

#[test]
fn swing_on_an_answer_moves_its_displayed_score_two_points() {
    let context = ForumContext::in_memory();
    let voter = signed_in(&context, "user@user.com");
    let answers = context.answers();

    let base = answers.list_answers(&"1".to_string())[1].score;
    let target = answers.list_answers(&"1".to_string())[1].id.clone();

    answers
        .vote_answer(Some(&voter), &"1".to_string(), &target, VoteDirection::Down)
        .expect("downvote");
    let swung = answers
        .vote_answer(Some(&voter), &"1".to_string(), &target, VoteDirection::Up)
        .expect("swing");

    assert_eq!(swung.viewer_vote, VoteState::Up);
    assert_eq!(swung.score, base + 1);
}

#[test]
fn unknown_question_id_is_reported_not_found() {
    let context = ForumContext::in_memory();
    let err = context
        .questions()
        .get_question(&"does-not-exist".to_string())
        .expect_err("unknown id");
    assert!(matches!(err, ForumError::NotFound(_)));
}

#[test]
fn answer_commit_raises_a_notification_and_an_activity() {
    let context = ForumContext::in_memory();
    let author = signed_in(&context, "dev@example.com");
    let questions = context.questions();
    let answers = context.answers();

    let question_id = questions
        .stage_question(
            Some(&author),
            stacklite_core::NewQuestion {
                title: "Where do notifications come from?".to_string(),
                body: "Asking for a friend.".to_string(),
                tags: vec!["meta".to_string()],
            },
        )
        .expect("stage")
        .commit(&questions)
        .expect("commit")
        .id;

    answers
        .stage_answer(Some(&author), &question_id, "From the commit path.")
        .expect("stage answer")
        .commit(&answers)
        .expect("commit answer");

    let center = context.notifications();
    let latest = &center.all()[0];
    assert_eq!(latest.kind, NotificationKind::Answer);
    assert_eq!(latest.related_question_id.as_deref(), Some(question_id.as_str()));
    assert!(center.unread_count() >= 1);

    let totals: u32 = context
        .activity()
        .records()
        .iter()
        .map(|record| record.total())
        .sum();
    assert_eq!(totals, 2, "one question plus one answer");
}

#[test]
fn deleting_a_local_question_drops_its_answers_and_markers() {
    let context = ForumContext::in_memory();
    let author = signed_in(&context, "user@user.com");
    let questions = context.questions();
    let answers = context.answers();

    let question_id = questions
        .stage_question(
            Some(&author),
            stacklite_core::NewQuestion {
                title: "Ephemeral".to_string(),
                body: "Body".to_string(),
                tags: vec!["cleanup".to_string()],
            },
        )
        .expect("stage")
        .commit(&questions)
        .expect("commit")
        .id;

    let answer_id = answers
        .stage_answer(Some(&author), &question_id, "Soon gone.")
        .expect("stage")
        .commit(&answers)
        .expect("commit")
        .id;
    answers
        .vote_answer(Some(&author), &question_id, &answer_id, VoteDirection::Up)
        .expect("vote answer");
    questions
        .vote_question(Some(&author), &question_id, VoteDirection::Up)
        .expect("vote question");

    questions
        .delete_question(Some(&author), &question_id)
        .expect("delete");

    assert!(answers.list_answers(&question_id).is_empty());
    assert!(matches!(
        questions.get_question(&question_id),
        Err(ForumError::NotFound(_))
    ));

    let question_markers: std::collections::BTreeMap<String, VoteState> =
        context.store.read("questionVotes");
    assert!(!question_markers.contains_key(&question_id));
}

#[test]
fn deleting_a_shadowing_question_does_not_leak_its_marker_to_the_baseline() {
    let context = ForumContext::in_memory();
    let voter = signed_in(&context, "user@user.com");
    let questions = context.questions();

    // Local shadow of baseline question "1", authored by the voter.
    let mut shadow = Question::new(
        "Local shadow of question 1",
        "Locally edited copy.",
        BTreeSet::from(["sql".to_string()]),
        voter.id.clone(),
        Utc::now(),
    );
    shadow.id = "1".to_string();
    context
        .store
        .write("userQuestions", &vec![shadow])
        .expect("seed local");

    questions
        .vote_question(Some(&voter), &"1".to_string(), VoteDirection::Up)
        .expect("upvote shadow");
    questions
        .delete_question(Some(&voter), &"1".to_string())
        .expect("delete shadow");

    // The baseline question resurfaces; the dead shadow's marker must
    // not re-apply to it.
    let resurfaced = questions
        .get_question(&"1".to_string())
        .expect("baseline question");
    assert_eq!(resurfaced.viewer_vote, VoteState::None);
    assert_eq!(resurfaced.score, 8);
}

#[test]
fn admin_keeps_moderate_after_reload() {
    let context = ForumContext::in_memory();
    let admin = signed_in(&context, "admin@admin.com");
    assert_eq!(admin.role, Role::Admin);

    // A fresh session over the same store re-reads the identity.
    assert_eq!(context.session().role(), Role::Admin);
}

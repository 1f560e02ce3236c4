//! Baseline dataset shipped with the application.
//!
//! # Responsibility
//! - Provide the fixed, non-persisted seed questions, answers and users
//!   that the reconciliation loader unions with local content.
//!
//! # Invariants
//! - The dataset is immutable; local writes never modify it.
//! - Only `SEEDED_ANSWER_QUESTION_ID` ships with baseline answers. This
//!   asymmetry is a known limitation carried over from the original
//!   fixture data, preserved deliberately.

use crate::model::question::{Answer, Question};
use crate::model::user::{Role, User};
use crate::model::EntityId;
use crate::vote::VoteState;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeSet;

/// The single baseline question that ships with seeded answers.
pub const SEEDED_ANSWER_QUESTION_ID: &str = "1";

/// Fixed identities known to the dummy sign-in flow.
pub fn baseline_users() -> Vec<User> {
    vec![
        User::new("1", "Admin User", "admin@admin.com", Role::Admin),
        User::new("2", "Regular User", "user@user.com", Role::User),
        User::new("3", "Developer123", "dev@example.com", Role::User),
        User::new("4", "TSLearner", "ts@example.com", Role::User),
        User::new("5", "CSSNewbie", "css@example.com", Role::User),
        User::new("6", "PythonDev", "python@example.com", Role::User),
    ]
}

/// Fixed seed questions, ids "1" through "5".
pub fn baseline_questions() -> Vec<Question> {
    vec![
        seed_question(
            "1",
            "How to join 2 columns in a data set to make a separate column in SQL",
            "I do not know the code for it as I am a beginner. As an example what I need to \
             do is like there is a column 1 containing First Name, and column 2 consists of \
             last name I want a column to combine both first name and last name.",
            &["sql", "join"],
            "2",
            8,
            2,
            true,
            at(2025, 8, 18, 10, 0),
        ),
        seed_question(
            "2",
            "React useState not updating state immediately",
            "I'm having trouble with useState not updating the state immediately when I call \
             the setter function. The component doesn't re-render with the new value.",
            &["react", "javascript", "hooks"],
            "3",
            15,
            4,
            true,
            at(2025, 8, 18, 8, 0),
        ),
        seed_question(
            "3",
            "Best practices for TypeScript interface design",
            "What are the best practices when designing interfaces in TypeScript? Should I \
             use interfaces or types? When should I extend vs when should I use union types?",
            &["typescript", "interfaces", "best-practices"],
            "4",
            23,
            6,
            true,
            at(2025, 8, 17, 12, 0),
        ),
        seed_question(
            "4",
            "CSS Grid vs Flexbox: When to use which?",
            "I'm confused about when to use CSS Grid and when to use Flexbox. Can someone \
             explain the main differences and use cases for each?",
            &["css", "grid", "flexbox"],
            "5",
            12,
            0,
            false,
            at(2025, 8, 16, 12, 0),
        ),
        seed_question(
            "5",
            "Python list comprehension vs for loop performance",
            "I've heard that list comprehensions are faster than for loops in Python. Is \
             this always true? When should I use each approach?",
            &["python", "performance", "list-comprehension"],
            "6",
            18,
            3,
            true,
            at(2025, 8, 15, 12, 0),
        ),
    ]
}

/// Baseline answers for one question id.
///
/// Only the seeded question returns a non-empty set; every other
/// baseline question answers empty (known limitation, see module docs).
pub fn baseline_answers(question_id: &EntityId) -> Vec<Answer> {
    if question_id != SEEDED_ANSWER_QUESTION_ID {
        return Vec::new();
    }
    vec![
        seed_answer(
            "a1",
            "1",
            "You can use the CONCAT function to combine columns in SQL: \
             `SELECT CONCAT(first_name, ' ', last_name) AS full_name FROM your_table;` \
             Alternatively, the `||` operator works in SQLite and PostgreSQL.",
            "3",
            15,
            true,
            at(2025, 8, 18, 11, 0),
        ),
        seed_answer(
            "a2",
            "1",
            "Another approach is to add a permanent column and backfill it: \
             `ALTER TABLE your_table ADD COLUMN full_name VARCHAR(255);` then \
             `UPDATE your_table SET full_name = CONCAT(first_name, ' ', last_name);`",
            "4",
            7,
            false,
            at(2025, 8, 18, 11, 30),
        ),
    ]
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[allow(clippy::too_many_arguments)]
fn seed_question(
    id: &str,
    title: &str,
    body: &str,
    tags: &[&str],
    author_id: &str,
    score: i64,
    answer_count: u32,
    accepted: bool,
    created_at: DateTime<Utc>,
) -> Question {
    Question {
        id: id.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        tags: tags.iter().map(|tag| (*tag).to_string()).collect::<BTreeSet<_>>(),
        author_id: author_id.to_string(),
        score,
        answer_count,
        accepted,
        created_at,
        viewer_vote: VoteState::None,
    }
}

fn seed_answer(
    id: &str,
    question_id: &str,
    body: &str,
    author_id: &str,
    score: i64,
    accepted: bool,
    created_at: DateTime<Utc>,
) -> Answer {
    Answer {
        id: id.to_string(),
        question_id: question_id.to_string(),
        body: body.to_string(),
        author_id: author_id.to_string(),
        score,
        accepted,
        created_at,
        viewer_vote: VoteState::None,
    }
}

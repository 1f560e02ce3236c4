//! Unread-tracking notification model.

use crate::model::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Producer category for one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Answer,
    Comment,
    Mention,
    Vote,
    Accepted,
}

/// One notification persisted under the `notifications` key.
///
/// Mutated only by the read-state transition; deleted only by explicit
/// user dismissal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_question_id: Option<EntityId>,
}

impl Notification {
    /// Creates an unread notification with a generated unique id.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        related_question_id: Option<EntityId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            body: body.into(),
            is_read: false,
            created_at,
            related_question_id,
        }
    }
}

//! Unread-tracking notification center.
//!
//! # Responsibility
//! - Maintain the `notifications` collection, newest first.
//! - Keep `unread_count` recomputed, never cached independently.
//!
//! # Invariants
//! - `mark_read` is idempotent; re-marking a read notification is a
//!   no-op, not an error.
//! - Notifications are deleted only by explicit user dismissal.

use crate::model::notification::{Notification, NotificationKind};
use crate::model::EntityId;
use crate::store::{keys, Store, StoreResult};
use chrono::Utc;
use std::rc::Rc;
use uuid::Uuid;

pub struct NotificationCenter {
    store: Rc<Store>,
}

impl NotificationCenter {
    pub fn new(store: Rc<Store>) -> Self {
        Self { store }
    }

    /// Current collection, newest first (fail-soft).
    pub fn all(&self) -> Vec<Notification> {
        self.store.read(keys::NOTIFICATIONS)
    }

    /// Prepends a new unread notification and returns it.
    pub fn add(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        related_question_id: Option<EntityId>,
    ) -> StoreResult<Notification> {
        let notification =
            Notification::new(kind, title, body, related_question_id, Utc::now());
        let mut notifications = self.all();
        notifications.insert(0, notification.clone());
        self.store.write(keys::NOTIFICATIONS, &notifications)?;
        log::debug!(
            "event=notification_added module=notify status=ok id={} unread={}",
            notification.id,
            self.unread_count()
        );
        Ok(notification)
    }

    /// Transitions one notification to read; idempotent.
    pub fn mark_read(&self, id: Uuid) -> StoreResult<()> {
        let mut notifications = self.all();
        let Some(target) = notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(());
        };
        if target.is_read {
            return Ok(());
        }
        target.is_read = true;
        self.store.write(keys::NOTIFICATIONS, &notifications)
    }

    /// Transitions every unread notification in one batch.
    pub fn mark_all_read(&self) -> StoreResult<()> {
        let mut notifications = self.all();
        if notifications.iter().all(|n| n.is_read) {
            return Ok(());
        }
        for notification in &mut notifications {
            notification.is_read = true;
        }
        self.store.write(keys::NOTIFICATIONS, &notifications)
    }

    /// Removes one notification; the only deletion path.
    pub fn dismiss(&self, id: Uuid) -> StoreResult<()> {
        let mut notifications = self.all();
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        if notifications.len() == before {
            return Ok(());
        }
        self.store.write(keys::NOTIFICATIONS, &notifications)
    }

    /// Unread count, recomputed from the collection on every call.
    pub fn unread_count(&self) -> usize {
        self.all().iter().filter(|n| !n.is_read).count()
    }
}

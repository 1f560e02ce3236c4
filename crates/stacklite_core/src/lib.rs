//! Local optimistic-state and synchronization core for the StackLite
//! question/answer forum.
//!
//! This crate is the single source of truth for the rules that let
//! multiple execution contexts (browser tabs) sharing one durable store
//! converge on a consistent view: the tri-state vote machine, the daily
//! activity aggregator, the unread-tracking notification center, the
//! capability gate, and the read-time reconciliation of local content
//! with the baseline dataset. Rendering, routing and theming live in
//! outer layers and call in through the services here.

pub mod access;
pub mod activity;
pub mod baseline;
pub mod bus;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod service;
pub mod session;
pub mod store;
pub mod vote;

pub use access::{has_capability, require, require_actor, Action, PermissionDenied};
pub use activity::{build_heatmap, level_for_count, weekly_grid, ActivityAggregator, HEATMAP_DAYS};
pub use bus::{ContextBus, TOPIC_ACTIVITY_UPDATED, TOPIC_QUESTION_UPDATED};
pub use context::{ContextHub, ForumContext};
pub use error::{ForumError, ForumResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{ActivityCell, ActivityKind, ActivityRecord};
pub use model::notification::{Notification, NotificationKind};
pub use model::question::{Answer, Question};
pub use model::settings::{QuestionDraft, UserSettings};
pub use model::user::{Role, User};
pub use model::EntityId;
pub use notify::NotificationCenter;
pub use service::answer_service::{AnswerService, PendingAnswer};
pub use service::question_service::{NewQuestion, PendingQuestion, QuestionService, MAX_TAGS};
pub use service::settings::{load_settings, save_settings};
pub use session::{ProfilePatch, Session};
pub use store::{
    open_store, open_store_in_memory, MemoryBackend, SqliteBackend, Store, StoreBackend,
    StoreError, StoreResult, SubscriptionToken,
};
pub use vote::{apply_vote, toggle_vote, Votable, VoteDirection, VoteOutcome, VoteState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

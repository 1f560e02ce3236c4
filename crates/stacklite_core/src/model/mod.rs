//! Domain model for the forum's local optimistic-state layer.
//!
//! # Responsibility
//! - Define the persisted shapes owned by the durable store.
//! - Keep derived values (totals, unread counts, heatmap levels)
//!   computed, never stored independently.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId`.
//! - Persisted shapes tolerate unknown fields from older writers.

pub mod activity;
pub mod notification;
pub mod question;
pub mod settings;
pub mod user;

/// Stable identifier for questions, answers and users.
///
/// Baseline fixtures use short numeric ids ("1".."5"); locally authored
/// content uses generated UUID strings. Kept as an alias to make semantic
/// intent explicit in signatures.
pub type EntityId = String;

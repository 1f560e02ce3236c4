//! Use-case services over the durable store and context bus.
//!
//! # Responsibility
//! - Provide the operation entry points UI actions call into.
//! - Enforce the gate-validate-mutate-notify ordering: capability check
//!   first, validation second, persistence third, fan-out last.

pub mod answer_service;
pub mod question_service;
pub mod settings;

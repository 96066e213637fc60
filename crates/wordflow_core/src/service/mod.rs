//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and the scheduling engine into the
//!   operations a serving layer calls.
//! - Keep serving layers decoupled from storage details.
//!
//! # Invariants
//! - Services never read the wall clock; `now` is always a parameter.
//! - Ownership is checked before any mutation; a foreign term is reported
//!   exactly like a missing one.

pub mod review_service;
pub mod stats_service;
pub mod term_service;
pub mod user_service;

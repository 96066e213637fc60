//! Domain model for the vocabulary trainer.
//!
//! # Responsibility
//! - Define the records shared by scheduling, aggregation and persistence.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Review events are append-only; nothing in core mutates them.

pub mod review;
pub mod tags;
pub mod term;
pub mod user;

//! Domain model for the shared task list and personal notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the task status cycle and its completion side effects.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation.
//! - Completion metadata exists only while a task is `done`.

pub mod note;
pub mod task;

//! Session domain module.
//!
//! This module contains the in-progress workout model, mutation inputs,
//! and the Session Store contract.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`WorkoutSession`, `Record`)
//! - `input`: Mutation inputs and validation (`RecordInput`, `RecordUpdate`)
//! - `repository`: Session Store trait
//!
//! # Usage
//!
//! ```ignore
//! use gymbro_core::session::{WorkoutSession, Record, SessionStore};
//! use gymbro_core::session::{RecordInput, RecordUpdate};
//! ```

mod input;
mod model;
mod repository;

// Re-export public API
pub use input::{MAX_REPS, MAX_WEIGHT, RecordInput, RecordUpdate, ValidSet};
pub use model::{Record, WorkoutSession};
pub use repository::SessionStore;

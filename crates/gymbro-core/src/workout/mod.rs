//! Workout history domain module.
//!
//! # Module Structure
//!
//! - `model`: Completed workout model (`Workout`)
//! - `repository`: Repository trait for the history store

mod model;
mod repository;

// Re-export public API
pub use model::Workout;
pub use repository::WorkoutRepository;

//! Domain layer for GYMBRO.
//!
//! Holds the workout-session model, scoring rules, engine settings and the
//! repository contracts. Nothing in this crate performs I/O.

pub mod config;
pub mod error;
pub mod repository;
pub mod scoring;
pub mod session;
pub mod user;
pub mod workout;

// Re-export common error type
pub use error::{ErrorKind, GymError};

//! Repository trait re-exports.
//!
//! This module provides centralized access to all repository traits.

pub use crate::session::SessionStore;
pub use crate::user::UserRepository;
pub use crate::workout::WorkoutRepository;

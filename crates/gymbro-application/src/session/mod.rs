//! Session application services.
//!
//! This module contains the workout session use cases, the end-of-session
//! reconciliation, and the read-modify-write helper they share.

mod reconcile;
mod service;
mod updater;

pub use reconcile::{EndedWorkout, SessionReconciler};
pub use service::WorkoutSessionService;
pub use updater::{MAX_UPDATE_ATTEMPTS, SealOutcome, SessionUpdater};

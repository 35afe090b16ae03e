//! Application layer for GYMBRO.
//!
//! Use cases that coordinate the domain rules in `gymbro-core` with the
//! stores behind its repository traits.

pub mod reclamation;
pub mod session;

pub use reclamation::{ReclamationReport, ReclamationScheduler, SchedulerHandle};
pub use session::{EndedWorkout, WorkoutSessionService};

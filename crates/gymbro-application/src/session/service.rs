//! Workout session use cases.
//!
//! `WorkoutSessionService` is the entry point transports call with an
//! already-authenticated user ID. It owns no state of its own: every
//! mutation is one read-modify-write cycle through the Session Store.

use crate::session::reconcile::{EndedWorkout, SessionReconciler};
use crate::session::updater::SessionUpdater;
use gymbro_core::config::EngineSettings;
use gymbro_core::error::{GymError, Result};
use gymbro_core::scoring;
use gymbro_core::session::{Record, RecordInput, RecordUpdate, SessionStore, WorkoutSession};
use gymbro_core::user::UserRepository;
use gymbro_core::workout::{Workout, WorkoutRepository};
use std::sync::Arc;

pub struct WorkoutSessionService {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserRepository>,
    workouts: Arc<dyn WorkoutRepository>,
    updater: SessionUpdater,
    reconciler: SessionReconciler,
    settings: EngineSettings,
}

impl WorkoutSessionService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserRepository>,
        workouts: Arc<dyn WorkoutRepository>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            updater: SessionUpdater::new(store.clone()),
            reconciler: SessionReconciler::new(
                store.clone(),
                users.clone(),
                workouts.clone(),
                &settings,
            ),
            store,
            users,
            workouts,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Starts a new workout for `user_id`.
    ///
    /// The active flag is set best-effort: if that write fails the session
    /// still exists and the failure is only logged.
    ///
    /// # Errors
    ///
    /// - `GymError::AlreadyActive`: the user already has a session
    pub async fn start(&self, user_id: &str) -> Result<WorkoutSession> {
        let session = WorkoutSession::new(user_id);
        self.store.create(&session).await?;

        if let Err(e) = self.users.set_active(user_id, true).await {
            tracing::warn!(
                target: "gymbro::session",
                user_id = %user_id,
                error = %e,
                "Failed to set active flag"
            );
        }

        tracing::info!(
            target: "gymbro::session",
            user_id = %user_id,
            session_id = %session.session_id,
            "Workout started"
        );
        Ok(session)
    }

    /// Logs a set in the active session.
    ///
    /// # Errors
    ///
    /// - `GymError::Validation`: a field is missing, not positive or too large
    /// - `GymError::NoActiveSession`: the user has no open session
    pub async fn add_record(&self, user_id: &str, input: &RecordInput) -> Result<Record> {
        let set = input.validate()?;
        let max = self.users.find_max(user_id, set.exercise_id).await?;
        let points = scoring::score_set(max.as_ref(), set.weight, set.reps, self.settings.scoring_base);

        let (session, record) = self
            .updater
            .update(user_id, |session| {
                let record = Record::new(
                    &session.session_id,
                    set.exercise_id,
                    set.reps,
                    set.weight,
                    points,
                );
                session.push_record(record.clone());
                Ok(record)
            })
            .await?;

        tracing::debug!(
            target: "gymbro::session",
            user_id = %user_id,
            record_id = %record.record_id,
            exercise_id = record.exercise_id,
            points = record.points,
            total = session.points,
            "Record added"
        );
        Ok(record)
    }

    /// Removes a set and subtracts its points from the session total.
    ///
    /// # Errors
    ///
    /// - `GymError::NotFound`: no such record in the active session
    /// - `GymError::NoActiveSession`: the user has no open session
    pub async fn remove_record(&self, user_id: &str, record_id: &str) -> Result<Record> {
        let (session, removed) = self
            .updater
            .update(user_id, |session| {
                session
                    .remove_record(record_id)
                    .ok_or_else(|| GymError::not_found("Record", record_id))
            })
            .await?;

        tracing::debug!(
            target: "gymbro::session",
            user_id = %user_id,
            record_id = %record_id,
            total = session.points,
            "Record removed"
        );
        Ok(removed)
    }

    /// Replaces reps and weight of a set and rescores it.
    ///
    /// # Errors
    ///
    /// - `GymError::Validation`: a field is missing, not positive or too large
    /// - `GymError::NotFound`: no such record in the active session
    /// - `GymError::NoActiveSession`: the user has no open session
    pub async fn update_record(
        &self,
        user_id: &str,
        record_id: &str,
        input: &RecordUpdate,
    ) -> Result<Record> {
        let (reps, weight) = input.validate()?;

        // A record's exercise never changes, so the baseline can be looked up
        // before the write cycle.
        let exercise_id = self
            .updater
            .load_open(user_id)
            .await?
            .find_record(record_id)
            .map(|r| r.exercise_id)
            .ok_or_else(|| GymError::not_found("Record", record_id))?;
        let max = self.users.find_max(user_id, exercise_id).await?;
        let points = scoring::score_set(max.as_ref(), weight, reps, self.settings.scoring_base);

        let (session, record) = self
            .updater
            .update(user_id, |session| {
                session
                    .update_record(record_id, reps, weight, points)
                    .ok_or_else(|| GymError::not_found("Record", record_id))?;
                session
                    .find_record(record_id)
                    .cloned()
                    .ok_or_else(|| GymError::not_found("Record", record_id))
            })
            .await?;

        tracing::debug!(
            target: "gymbro::session",
            user_id = %user_id,
            record_id = %record_id,
            points = record.points,
            total = session.points,
            "Record updated"
        );
        Ok(record)
    }

    /// Ends the user's workout and persists it.
    ///
    /// # Errors
    ///
    /// - `GymError::NoActiveSession`: no session, or another end owns it
    /// - `GymError::StoreUnavailable`: a store failed mid-way; the session is
    ///   reopened and can be ended again
    pub async fn end(&self, user_id: &str) -> Result<EndedWorkout> {
        self.reconciler
            .reconcile(user_id, None)
            .await?
            .ok_or_else(|| GymError::no_active_session(user_id))
    }

    /// Ends a session observed as stale, unless it has changed since.
    pub async fn end_stale(&self, session: &WorkoutSession) -> Result<Option<EndedWorkout>> {
        self.reconciler
            .reconcile(&session.user_id, Some(session.revision))
            .await
    }

    /// Snapshot of sessions idle longer than the inactivity timeout.
    pub async fn stale_sessions(&self) -> Result<Vec<WorkoutSession>> {
        self.store.list_stale(self.settings.inactivity_timeout).await
    }

    /// Returns a copy of the user's open session.
    ///
    /// # Errors
    ///
    /// - `GymError::NoActiveSession`: none, or it is being ended
    pub async fn current_session(&self, user_id: &str) -> Result<WorkoutSession> {
        self.updater.load_open(user_id).await
    }

    /// Reads back a completed workout owned by `user_id`.
    ///
    /// # Errors
    ///
    /// - `GymError::NotFound`: no such workout
    /// - `GymError::Forbidden`: the workout belongs to another user
    pub async fn get_workout(&self, user_id: &str, workout_id: &str) -> Result<Workout> {
        let workout = self
            .workouts
            .find_by_id(workout_id)
            .await?
            .ok_or_else(|| GymError::not_found("Workout", workout_id))?;

        if workout.user_id != user_id {
            return Err(GymError::forbidden(format!(
                "workout '{}' belongs to another user",
                workout_id
            )));
        }
        Ok(workout)
    }
}

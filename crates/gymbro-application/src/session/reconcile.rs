//! End-of-session reconciliation.
//!
//! Turns an active session into durable history:
//!
//! 1. seal the session so no mutation can land behind our back
//! 2. pick the best set per exercise
//! 3. load the user's stored maxes
//! 4. write every improved max and award its bonus
//! 5. save the completed workout (skipped when it has no records)
//! 6. delete the session
//! 7. clear the user's active flag
//!
//! A seal carries a timestamp. While it is younger than the configured lease,
//! any other End or sweep for the same user backs off, so only one
//! reconciliation runs at a time.
//!
//! Any failure before the session is deleted stops the sequence, releases
//! the seal and is returned. The session is back in the store as it was,
//! including its `last_updated`, so a later End or the next scheduler tick
//! starts over from step 1. A seal left by a crashed process is taken over
//! once its lease expires. A max written before a failure is not re-awarded
//! a bonus on the retry, because the stored max no longer improves.

use crate::session::updater::{SealOutcome, SessionUpdater};
use chrono::Utc;
use gymbro_core::config::EngineSettings;
use gymbro_core::error::Result;
use gymbro_core::scoring;
use gymbro_core::session::{SessionStore, WorkoutSession};
use gymbro_core::user::{Max, UserRepository};
use gymbro_core::workout::{Workout, WorkoutRepository};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Summary of an ended session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndedWorkout {
    /// The completed workout. Not persisted when it has no records.
    pub workout: Workout,
    /// Personal records written by this reconciliation.
    pub new_maxes: Vec<Max>,
}

pub struct SessionReconciler {
    store: Arc<dyn SessionStore>,
    users: Arc<dyn UserRepository>,
    workouts: Arc<dyn WorkoutRepository>,
    updater: SessionUpdater,
    personal_record_bonus: i64,
    seal_lease: Duration,
}

impl SessionReconciler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        users: Arc<dyn UserRepository>,
        workouts: Arc<dyn WorkoutRepository>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            updater: SessionUpdater::new(store.clone()),
            store,
            users,
            workouts,
            personal_record_bonus: settings.personal_record_bonus,
            seal_lease: settings.seal_lease,
        }
    }

    /// Runs the full reconciliation for `user_id`.
    ///
    /// Returns `Ok(None)` when another reconciliation owns the session, or
    /// when `expected_revision` is set and the session moved past it.
    pub async fn reconcile(
        &self,
        user_id: &str,
        expected_revision: Option<u64>,
    ) -> Result<Option<EndedWorkout>> {
        let sealed = match self
            .updater
            .seal(user_id, expected_revision, self.seal_lease)
            .await?
        {
            SealOutcome::Sealed(session) => session,
            SealOutcome::Superseded => {
                tracing::debug!(
                    target: "gymbro::reconcile",
                    user_id = %user_id,
                    "Session already claimed or changed, skipping"
                );
                return Ok(None);
            }
        };

        let mut session = sealed.clone();
        let (workout, new_maxes) = match self.persist(&mut session).await {
            Ok(persisted) => persisted,
            Err(e) => {
                self.release(&sealed).await;
                return Err(e);
            }
        };

        self.users.set_active(user_id, false).await?;

        tracing::info!(
            target: "gymbro::reconcile",
            user_id = %user_id,
            session_id = %session.session_id,
            points = workout.points,
            records = workout.records.len(),
            new_maxes = new_maxes.len(),
            "Workout ended"
        );

        Ok(Some(EndedWorkout { workout, new_maxes }))
    }

    /// Steps 2 to 6. Once this returns `Ok` the session is gone from the
    /// store.
    async fn persist(&self, session: &mut WorkoutSession) -> Result<(Workout, Vec<Max>)> {
        let new_maxes = self.apply_personal_records(session).await?;

        let workout = Workout::from_session(session, Utc::now());
        if workout.records.is_empty() {
            tracing::debug!(
                target: "gymbro::reconcile",
                session_id = %session.session_id,
                "Empty session, nothing to persist"
            );
        } else {
            self.workouts.save(&workout).await?;
        }

        match self.store.delete(&session.user_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    target: "gymbro::reconcile",
                    user_id = %session.user_id,
                    "Session already deleted"
                );
            }
            Err(e) => return Err(e),
        }

        Ok((workout, new_maxes))
    }

    /// Best-effort: if this fails too, the seal expires after its lease.
    async fn release(&self, sealed: &WorkoutSession) {
        match self.updater.release(sealed).await {
            Ok(true) => {
                tracing::info!(
                    target: "gymbro::reconcile",
                    user_id = %sealed.user_id,
                    session_id = %sealed.session_id,
                    "Reconciliation failed, session reopened"
                );
            }
            Ok(false) => {
                tracing::debug!(
                    target: "gymbro::reconcile",
                    user_id = %sealed.user_id,
                    "Seal already gone, nothing to release"
                );
            }
            Err(e) => {
                tracing::warn!(
                    target: "gymbro::reconcile",
                    user_id = %sealed.user_id,
                    error = %e,
                    "Failed to release seal; it expires with its lease"
                );
            }
        }
    }

    /// Steps 2 to 4: writes improved maxes and awards bonuses in `session`.
    async fn apply_personal_records(&self, session: &mut WorkoutSession) -> Result<Vec<Max>> {
        let best = scoring::best_sets(&session.records);
        if best.is_empty() {
            return Ok(Vec::new());
        }

        let stored: HashMap<i64, Max> = self
            .users
            .list_maxes(&session.user_id)
            .await?
            .into_iter()
            .map(|max| (max.exercise_id, max))
            .collect();

        let mut new_maxes = Vec::new();
        for (exercise_id, index) in best {
            let record = &session.records[index];
            if !scoring::improves(stored.get(&exercise_id), record.weight, record.reps) {
                continue;
            }

            let max = Max::new(&session.user_id, exercise_id, record.weight, record.reps);
            self.users.upsert_max(&max).await?;
            session.award_bonus(index, self.personal_record_bonus);

            tracing::debug!(
                target: "gymbro::reconcile",
                user_id = %session.user_id,
                exercise_id,
                max_weight = max.max_weight,
                reps = max.reps,
                "New personal record"
            );
            new_maxes.push(max);
        }

        Ok(new_maxes)
    }
}

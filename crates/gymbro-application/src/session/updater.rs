//! Session updater helper for read-modify-write cycles.
//!
//! `SessionUpdater` wraps the "get → modify → update" pattern every session
//! mutation follows. The store's `update` is a compare-and-swap on the
//! session revision, so a cycle that raced another writer fails with
//! `Conflict` and is replayed against the fresh copy.

use chrono::Utc;
use gymbro_core::error::{GymError, Result};
use gymbro_core::session::{SessionStore, WorkoutSession};
use std::sync::Arc;
use std::time::Duration;

/// Attempts per read-modify-write before giving up.
pub const MAX_UPDATE_ATTEMPTS: usize = 8;

/// Result of trying to claim a session for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SealOutcome {
    /// This caller sealed the session and owns its reconciliation.
    Sealed(WorkoutSession),
    /// Another reconciliation claimed it first, or it changed since it was
    /// observed as stale.
    Superseded,
}

pub struct SessionUpdater {
    store: Arc<dyn SessionStore>,
    max_attempts: usize,
}

impl SessionUpdater {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            max_attempts: MAX_UPDATE_ATTEMPTS,
        }
    }

    /// Loads the user's open session.
    ///
    /// # Errors
    ///
    /// `GymError::NoActiveSession` when there is no session or it is already
    /// being ended.
    pub async fn load_open(&self, user_id: &str) -> Result<WorkoutSession> {
        let session = self.load(user_id).await?;
        if session.is_sealed() {
            return Err(GymError::no_active_session(user_id));
        }
        Ok(session)
    }

    /// Applies `updater` to the user's open session and writes it back.
    ///
    /// `updater` may run more than once; it must derive everything from the
    /// session it is handed. Its error aborts the cycle without writing.
    ///
    /// # Returns
    ///
    /// The stored session (new revision, refreshed `last_updated`) and the
    /// updater's output.
    ///
    /// # Errors
    ///
    /// - `GymError::NoActiveSession`: no session, or it is being ended
    /// - any error returned by `updater`
    /// - `GymError::StoreUnavailable`: store failure, or conflicts persisted
    ///   past the attempt limit
    pub async fn update<F, T>(&self, user_id: &str, mut updater: F) -> Result<(WorkoutSession, T)>
    where
        F: FnMut(&mut WorkoutSession) -> Result<T> + Send,
        T: Send,
    {
        for attempt in 1..=self.max_attempts {
            let mut session = self.load_open(user_id).await?;
            let output = updater(&mut session)?;

            match self.store.update(user_id, &session).await {
                Ok(saved) => return Ok((saved, output)),
                Err(e) if e.is_conflict() => {
                    tracing::debug!(
                        target: "gymbro::session",
                        user_id = %user_id,
                        attempt,
                        "Concurrent session update, retrying"
                    );
                }
                Err(e) if e.is_not_found() => {
                    return Err(GymError::no_active_session(user_id));
                }
                Err(e) => return Err(e),
            }
        }

        Err(self.exhausted(user_id))
    }

    /// Claims the user's session for reconciliation by setting `sealed_at`.
    ///
    /// A seal younger than `lease` belongs to a reconciliation that may still
    /// be running, so the claim is refused. An older seal was left by a
    /// reconciliation that died without releasing it and is taken over. With
    /// `expected_revision` set, the claim is also refused if the session has
    /// changed since it was observed.
    ///
    /// The seal is written with `update_seal`, so the session keeps its
    /// staleness.
    ///
    /// # Errors
    ///
    /// - `GymError::NoActiveSession`: no session
    /// - `GymError::StoreUnavailable`: store failure or persistent conflicts
    pub async fn seal(
        &self,
        user_id: &str,
        expected_revision: Option<u64>,
        lease: Duration,
    ) -> Result<SealOutcome> {
        for attempt in 1..=self.max_attempts {
            let mut session = self.load(user_id).await?;
            if expected_revision.is_some_and(|rev| rev != session.revision) {
                return Ok(SealOutcome::Superseded);
            }
            let now = Utc::now();
            if session.seal_is_held(now, lease) {
                return Ok(SealOutcome::Superseded);
            }
            if let Some(sealed_at) = session.sealed_at {
                tracing::warn!(
                    target: "gymbro::session",
                    user_id = %user_id,
                    sealed_at = %sealed_at,
                    "Taking over an expired seal"
                );
            }
            let was_sealed = session.is_sealed();
            session.sealed_at = Some(now);

            match self.store.update_seal(user_id, &session).await {
                Ok(saved) => return Ok(SealOutcome::Sealed(saved)),
                Err(e) if e.is_conflict() => {
                    // Sealed sessions accept no mutations; only another claim can race us
                    if was_sealed || expected_revision.is_some() {
                        return Ok(SealOutcome::Superseded);
                    }
                    if self.load(user_id).await?.is_sealed() {
                        return Ok(SealOutcome::Superseded);
                    }
                    tracing::debug!(
                        target: "gymbro::session",
                        user_id = %user_id,
                        attempt,
                        "Session changed while sealing, retrying"
                    );
                }
                Err(e) if e.is_not_found() => {
                    return Err(GymError::no_active_session(user_id));
                }
                Err(e) => return Err(e),
            }
        }

        Err(self.exhausted(user_id))
    }

    /// Reopens a session sealed by this caller after its reconciliation
    /// failed.
    ///
    /// `sealed` must be the copy returned by [`seal`](Self::seal). The stored
    /// session gets its seal cleared and keeps its `last_updated`, so the
    /// user can keep working and a stale session is swept again on the next
    /// tick. Returns `false` when the session was deleted or taken over in
    /// the meantime.
    pub async fn release(&self, sealed: &WorkoutSession) -> Result<bool> {
        let mut reopened = sealed.clone();
        reopened.sealed_at = None;

        match self.store.update_seal(&sealed.user_id, &reopened).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_conflict() || e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn load(&self, user_id: &str) -> Result<WorkoutSession> {
        self.store.get(user_id).await.map_err(|e| {
            if e.is_not_found() {
                GymError::no_active_session(user_id)
            } else {
                e
            }
        })
    }

    fn exhausted(&self, user_id: &str) -> GymError {
        tracing::warn!(
            target: "gymbro::session",
            user_id = %user_id,
            attempts = self.max_attempts,
            "Session update kept conflicting"
        );
        GymError::store(format!(
            "session for user '{}' is under heavy contention; try again later",
            user_id
        ))
    }
}

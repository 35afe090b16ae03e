//! Reclamation scheduler.
//!
//! A single background task that, on a fixed interval, force-ends every
//! session idle for longer than the inactivity timeout. Each stale session
//! goes through the same reconciliation as an explicit End.

use crate::session::WorkoutSessionService;
use gymbro_core::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReclamationReport {
    /// Session IDs that were ended
    pub ended: Vec<String>,
    /// Sessions left alone because they changed or were claimed elsewhere
    pub skipped: Vec<String>,
    /// `(session_id, error)` for reconciliations that failed
    pub failed: Vec<(String, String)>,
}

pub struct ReclamationScheduler {
    service: Arc<WorkoutSessionService>,
    interval: Duration,
}

impl ReclamationScheduler {
    pub fn new(service: Arc<WorkoutSessionService>) -> Self {
        let interval = service.settings().scheduler_interval;
        Self { service, interval }
    }

    /// Runs one sweep to completion.
    ///
    /// A failure for one session is recorded in the report and does not stop
    /// the others. Only a failure to list stale sessions is an error.
    pub async fn reclaim_once(&self) -> Result<ReclamationReport> {
        let stale = self.service.stale_sessions().await?;
        let mut report = ReclamationReport::default();

        for session in stale {
            match self.service.end_stale(&session).await {
                Ok(Some(_)) => report.ended.push(session.session_id),
                Ok(None) => report.skipped.push(session.session_id),
                Err(e) => {
                    tracing::error!(
                        target: "gymbro::reclamation",
                        user_id = %session.user_id,
                        session_id = %session.session_id,
                        error = %e,
                        "Failed to end stale session"
                    );
                    report.failed.push((session.session_id, e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Spawns the sweep loop. The first sweep happens one interval after
    /// start.
    pub fn start(self) -> SchedulerHandle {
        let token = CancellationToken::new();
        let child = token.clone();

        let join = tokio::spawn(async move {
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            tracing::info!(
                target: "gymbro::reclamation",
                interval_secs = self.interval.as_secs(),
                "Scheduler started"
            );

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                match self.reclaim_once().await {
                    Ok(report) => {
                        tracing::info!(
                            target: "gymbro::reclamation",
                            ended_sessions = report.ended.len(),
                            skipped = report.skipped.len(),
                            failed = report.failed.len(),
                            "Sweep finished"
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            target: "gymbro::reclamation",
                            error = %e,
                            "Failed to list stale sessions"
                        );
                    }
                }
            }

            tracing::info!(target: "gymbro::reclamation", "Scheduler stopped");
        });

        SchedulerHandle { token, join }
    }
}

/// Owns the running scheduler task.
///
/// Dropping the handle leaves the task running; call [`shutdown`] to stop it.
///
/// [`shutdown`]: SchedulerHandle::shutdown
pub struct SchedulerHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signals the loop to stop and waits for it. A sweep already in
    /// progress runs to completion first.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.join.await {
            tracing::warn!(
                target: "gymbro::reclamation",
                error = %e,
                "Scheduler task ended abnormally"
            );
        }
    }
}

mod common;

use common::Harness;
use gymbro_application::ReclamationScheduler;
use gymbro_core::error::{ErrorKind, GymError};
use gymbro_core::session::{Record, RecordInput, SessionStore, WorkoutSession};
use gymbro_core::user::{Max, UserRepository};
use gymbro_core::workout::WorkoutRepository;
use chrono::Utc;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn start_survives_active_flag_failure() {
    let h = Harness::new();
    h.users.fail_flag_writes.store(true, Ordering::SeqCst);

    let session = h.service.start("user-1").await.unwrap();

    assert_eq!(h.store.get("user-1").await.unwrap(), session);
    assert!(!h.users.is_active("user-1").await.unwrap());
}

#[tokio::test]
async fn failed_history_write_reopens_session_for_retry() {
    let h = Harness::new();
    h.service.start("user-1").await.unwrap();
    h.service
        .add_record("user-1", &RecordInput::new(7, 5, 100))
        .await
        .unwrap();
    let before = h.store.get("user-1").await.unwrap();
    h.workouts.set_failing(true);

    let err = h.service.end("user-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

    // Max was written before the failure; the session is back as it was
    assert_eq!(
        h.users.find_max("user-1", 7).await.unwrap(),
        Some(Max::new("user-1", 7, 100, 5))
    );
    let reopened = h.store.get("user-1").await.unwrap();
    assert!(!reopened.is_sealed());
    assert_eq!(reopened.records, before.records);
    assert_eq!(reopened.points, 100);
    assert_eq!(reopened.last_updated, before.last_updated);
    assert!(h.users.is_active("user-1").await.unwrap());

    // Still the user's one session: it takes sets and blocks a new start
    h.service
        .add_record("user-1", &RecordInput::new(3, 10, 40))
        .await
        .unwrap();
    let err = h.service.start("user-1").await.unwrap_err();
    assert!(matches!(err, GymError::AlreadyActive { .. }));

    h.workouts.set_failing(false);
    let ended = h.service.end("user-1").await.unwrap();

    assert_eq!(ended.workout.workout_id, before.session_id);
    assert_eq!(ended.new_maxes, vec![Max::new("user-1", 3, 40, 10)]);
    assert_eq!(ended.workout.points, 250);
    assert_eq!(h.workouts.list_by_user("user-1").await.unwrap().len(), 1);
    assert!(h.store.is_empty().await);
    assert!(!h.users.is_active("user-1").await.unwrap());
}

#[tokio::test]
async fn scheduler_retries_a_failed_reconciliation_on_the_next_tick() {
    let h = Harness::new();
    let mut session = WorkoutSession::new("user-1");
    let session_id = session.session_id.clone();
    session.push_record(Record::new(&session_id, 7, 5, 100, 100));
    let idle = h.insert_idle(session).await;
    h.workouts.set_failing(true);

    let scheduler = ReclamationScheduler::new(h.service.clone());
    let report = scheduler.reclaim_once().await.unwrap();
    assert!(report.ended.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, session_id);

    let reopened = h.store.get("user-1").await.unwrap();
    assert!(!reopened.is_sealed());
    assert_eq!(reopened.last_updated, idle.last_updated);

    h.workouts.set_failing(false);
    let report = scheduler.reclaim_once().await.unwrap();
    assert_eq!(report.ended, vec![session_id.clone()]);
    assert!(report.failed.is_empty());
    assert!(h.workouts.find_by_id(&session_id).await.unwrap().is_some());
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn abandoned_seal_is_taken_over_after_its_lease() {
    let h = Harness::new();
    let mut crashed = WorkoutSession::new("user-1");
    crashed.sealed_at = Some(Utc::now() - chrono::Duration::minutes(2));
    let crashed = h.insert_idle(crashed).await;
    let mut in_flight = WorkoutSession::new("user-2");
    in_flight.sealed_at = Some(Utc::now());
    let in_flight = h.insert_idle(in_flight).await;

    let report = ReclamationScheduler::new(h.service.clone())
        .reclaim_once()
        .await
        .unwrap();

    assert_eq!(report.ended, vec![crashed.session_id]);
    assert_eq!(report.skipped, vec![in_flight.session_id]);
    assert!(h.store.get("user-2").await.unwrap().is_sealed());
}

#[tokio::test]
async fn one_failing_session_does_not_block_the_sweep() {
    let h = Harness::new();
    let mut with_records = WorkoutSession::new("user-1");
    let id = with_records.session_id.clone();
    with_records.push_record(Record::new(&id, 7, 5, 100, 100));
    h.insert_idle(with_records).await;
    // Empty sessions never touch the history store
    let empty = h.insert_idle(WorkoutSession::new("user-2")).await;
    h.workouts.set_failing(true);

    let report = ReclamationScheduler::new(h.service.clone())
        .reclaim_once()
        .await
        .unwrap();

    assert_eq!(report.ended, vec![empty.session_id]);
    assert_eq!(report.failed.len(), 1);
    assert!(h.store.get("user-1").await.is_ok());
    assert!(h.store.get("user-2").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn flag_failure_on_end_is_surfaced_after_history_is_saved() {
    let h = Harness::new();
    h.service.start("user-1").await.unwrap();
    h.service
        .add_record("user-1", &RecordInput::new(7, 5, 100))
        .await
        .unwrap();
    h.users.fail_flag_writes.store(true, Ordering::SeqCst);

    let err = h.service.end("user-1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert!(err.kind().http_status() >= 500);
    assert_eq!(h.workouts.list_by_user("user-1").await.unwrap().len(), 1);
    assert!(h.store.is_empty().await);
}

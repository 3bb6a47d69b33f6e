//! Workflow Handle Unit Tests
//!
//! Tests for the async workflow driver including:
//! - Concurrent triggers while a call is pending
//! - Timeout cancellation restoring the pre-call state
//! - Dropped callers aborting their pending call
//! - Remote failures and retry
//! - Persisted history ordering

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::core::content::{
    ContentType, GenerationRequest, LifecycleState, Operation, ScheduleRequest, WorkflowError,
    WorkflowHandle,
};
use crate::core::service::{GeneratedContent, MockContentService, ServiceError};
use crate::tests::mocks::FakeContentService;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn tomorrow_noon() -> ScheduleRequest {
    ScheduleRequest::new("2024-06-11", "12:00")
}

fn request() -> GenerationRequest {
    GenerationRequest::new("patriotism", ContentType::Post, "passionate", 150)
}

async fn wait_for_state(handle: &WorkflowHandle, state: LifecycleState) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while handle.state().await != Some(state) {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("workflow never reached the expected state");
}

async fn previewing(handle: &WorkflowHandle) {
    handle.generate(&request()).await.unwrap();
    handle.open_preview().await.unwrap();
}

// =============================================================================
// In-flight Guard
// =============================================================================

#[tokio::test]
async fn test_concurrent_schedule_second_gets_in_progress() {
    let service = FakeContentService::gated();
    let handle = WorkflowHandle::new(service.clone(), Duration::from_secs(5));
    previewing(&handle).await;

    let first = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.schedule_on(&tomorrow_noon(), today()).await })
    };
    wait_for_state(&handle, LifecycleState::Scheduling).await;

    let second = handle.schedule_on(&tomorrow_noon(), today()).await;
    assert_eq!(
        second.unwrap_err(),
        WorkflowError::OperationInProgress {
            operation: Operation::Schedule
        }
    );
    // Not queued: the state is still the first call's.
    assert_eq!(handle.state().await, Some(LifecycleState::Scheduling));

    service.release();
    let item = first.await.unwrap().unwrap();
    assert_eq!(item.lifecycle_state, LifecycleState::Scheduled);
    assert_eq!(service.schedule_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_generate_rejected_while_saving() {
    let service = FakeContentService::gated();
    let handle = WorkflowHandle::new(service.clone(), Duration::from_secs(5));
    previewing(&handle).await;

    let save = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.save().await })
    };
    wait_for_state(&handle, LifecycleState::Saving).await;

    assert!(matches!(
        handle.generate(&request()).await,
        Err(WorkflowError::OperationInProgress {
            operation: Operation::Save
        })
    ));

    service.release();
    let saved = save.await.unwrap().unwrap();
    assert_eq!(saved.lifecycle_state, LifecycleState::Saved);
    assert_eq!(saved.id.as_deref(), Some("saved-1"));
    assert_eq!(service.generate_calls.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Timeouts
// =============================================================================

#[tokio::test]
async fn test_timeout_restores_previewing() {
    let service = FakeContentService::slow(Duration::from_millis(500));
    let handle = WorkflowHandle::new(service.clone(), Duration::from_millis(50));
    previewing(&handle).await;

    let err = handle.schedule_on(&tomorrow_noon(), today()).await.unwrap_err();
    assert_eq!(
        err,
        WorkflowError::Cancelled {
            operation: Operation::Schedule
        }
    );

    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.state(), Some(LifecycleState::Previewing));
    assert!(snapshot.in_flight().is_none());
    assert_eq!(snapshot.status(Operation::Schedule).last_error, Some(err));
    assert!(snapshot.item().unwrap().scheduled_for.is_none());
}

#[tokio::test]
async fn test_transport_timeout_is_cancellation() {
    let mut service = MockContentService::new();
    service
        .expect_generate_content()
        .returning(|_| Err(ServiceError::TimedOut));
    let handle = WorkflowHandle::new(Arc::new(service), Duration::from_secs(5));

    let err = handle.generate(&request()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Cancelled { .. }));
    // Nothing existed before the call, so nothing exists after it.
    assert_eq!(handle.state().await, None);
}

// =============================================================================
// Dropped Callers
// =============================================================================

#[tokio::test]
async fn test_aborted_save_restores_previewing() {
    let service = FakeContentService::gated();
    let handle = WorkflowHandle::new(service.clone(), Duration::from_secs(5));
    previewing(&handle).await;

    let save = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.save().await })
    };
    wait_for_state(&handle, LifecycleState::Saving).await;
    save.abort();
    assert!(save.await.unwrap_err().is_cancelled());

    wait_for_state(&handle, LifecycleState::Previewing).await;
    let snapshot = handle.snapshot().await;
    assert!(snapshot.in_flight().is_none());
    assert_eq!(
        snapshot.status(Operation::Save).last_error,
        Some(WorkflowError::Cancelled {
            operation: Operation::Save
        })
    );

    // The workflow is usable again.
    let retry = {
        let handle = handle.clone();
        tokio::spawn(async move { handle.save().await })
    };
    wait_for_state(&handle, LifecycleState::Saving).await;
    service.release();
    let saved = retry.await.unwrap().unwrap();
    assert_eq!(saved.lifecycle_state, LifecycleState::Saved);
}

#[tokio::test]
async fn test_dropped_schedule_in_select_restores_previewing() {
    let service = FakeContentService::gated();
    let handle = WorkflowHandle::new(service.clone(), Duration::from_secs(5));
    previewing(&handle).await;

    let when = tomorrow_noon();
    tokio::select! {
        _ = handle.schedule_on(&when, today()) => panic!("gated call finished"),
        _ = tokio::time::sleep(Duration::from_millis(50)) => {}
    }

    wait_for_state(&handle, LifecycleState::Previewing).await;
    assert!(handle.snapshot().await.in_flight().is_none());
    assert!(handle.generate(&request()).await.is_ok());
}

#[tokio::test]
async fn test_reset_keeps_persisted_history() {
    let service = FakeContentService::new();
    let handle = WorkflowHandle::new(service.clone(), Duration::from_secs(5));
    previewing(&handle).await;
    handle.save().await.unwrap();
    previewing(&handle).await;

    handle.reset().await;

    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.state(), None);
    assert_eq!(snapshot.persisted().len(), 1);
    assert_eq!(snapshot.persisted()[0].id.as_deref(), Some("saved-1"));
}

// =============================================================================
// Failure and Retry
// =============================================================================

#[tokio::test]
async fn test_generation_failure_then_retry() {
    let mut service = MockContentService::new();
    let mut seq = mockall::Sequence::new();
    service
        .expect_generate_content()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(ServiceError::unreachable("connection refused")));
    service
        .expect_generate_content()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|req| {
            Ok(GeneratedContent {
                id: None,
                text: format!("Second try on {}", req.topic),
            })
        });
    let handle = WorkflowHandle::new(Arc::new(service), Duration::from_secs(5));

    let err = handle.generate(&request()).await.unwrap_err();
    assert!(matches!(err, WorkflowError::RemoteUnreachable { .. }));
    assert_eq!(handle.state().await, Some(LifecycleState::Failed));

    let item = handle.retry().await.unwrap();
    assert_eq!(item.lifecycle_state, LifecycleState::Draft);

    let item = handle.generate(&request()).await.unwrap();
    assert_eq!(item.text, "Second try on patriotism");
    assert!(handle.snapshot().await.last_error().is_none());
}

#[tokio::test]
async fn test_schedule_rejection_fails_item() {
    let mut service = MockContentService::new();
    service.expect_generate_content().returning(|_| {
        Ok(GeneratedContent {
            id: Some("c-1".into()),
            text: "Ready to go.".into(),
        })
    });
    service
        .expect_schedule_content()
        .returning(|_, _| Err(ServiceError::rejected("publish window closed")));
    let handle = WorkflowHandle::new(Arc::new(service), Duration::from_secs(5));

    handle.generate(&request()).await.unwrap();
    handle.open_preview().await.unwrap();
    let err = handle.schedule_on(&tomorrow_noon(), today()).await.unwrap_err();

    assert_eq!(err, WorkflowError::rejected("publish window closed"));
    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.state(), Some(LifecycleState::Failed));
    assert_eq!(snapshot.last_error(), Some(&err));
    assert!(snapshot.persisted().is_empty());
}

#[tokio::test]
async fn test_validation_never_reaches_service() {
    let mut service = MockContentService::new();
    service.expect_generate_content().returning(|_| {
        Ok(GeneratedContent {
            id: None,
            text: "Draft".into(),
        })
    });
    service.expect_schedule_content().never();
    let handle = WorkflowHandle::new(Arc::new(service), Duration::from_secs(5));

    handle.generate(&request()).await.unwrap();
    // Schedule without preview
    assert!(matches!(
        handle.schedule_on(&tomorrow_noon(), today()).await,
        Err(WorkflowError::InvalidTransition { .. })
    ));

    handle.open_preview().await.unwrap();
    let missing_time = ScheduleRequest {
        date: Some("2024-06-11".into()),
        time: None,
    };
    assert!(matches!(
        handle.schedule_on(&missing_time, today()).await,
        Err(WorkflowError::ValidationFailed { .. })
    ));
    assert_eq!(handle.state().await, Some(LifecycleState::Previewing));
}

// =============================================================================
// History
// =============================================================================

#[tokio::test]
async fn test_persisted_items_in_order() {
    let service = FakeContentService::new();
    let handle = WorkflowHandle::new(service.clone(), Duration::from_secs(5));

    for _ in 0..3 {
        previewing(&handle).await;
        handle.schedule_on(&tomorrow_noon(), today()).await.unwrap();
    }

    let snapshot = handle.snapshot().await;
    let ids: Vec<_> = snapshot
        .scheduled()
        .filter_map(|i| i.id.clone())
        .collect();
    assert_eq!(ids, vec!["sched-1", "sched-2", "sched-3"]);
}

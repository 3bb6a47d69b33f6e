//! Workflow Handle
//!
//! Cloneable async driver for a [`ContentWorkflow`]. The workflow lock is
//! held only while a transition is applied, never across the service call,
//! so a concurrent caller sees the pending operation and is rejected with
//! `OperationInProgress` instead of queueing behind it.
//!
//! Each service call is bounded by the handle's timeout. On expiry the
//! pending transition is cancelled and the item returns to its pre-call
//! state. Dropping one of the returned futures mid-call (an aborted task or
//! a losing `select!` branch) aborts the pending call the same way.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;

use super::errors::{Result, WorkflowError};
use super::types::{ContentItem, GenerationRequest, LifecycleState, Operation, ScheduleRequest};
use super::workflow::{ContentWorkflow, PendingCall};
use crate::core::service::{ContentService, ServiceError, ServiceResult};

#[derive(Clone)]
pub struct WorkflowHandle {
    inner: Arc<Mutex<ContentWorkflow>>,
    service: Arc<dyn ContentService>,
    timeout: Duration,
}

impl WorkflowHandle {
    pub fn new(service: Arc<dyn ContentService>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ContentWorkflow::new())),
            service,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Copy of the workflow as it is right now.
    pub async fn snapshot(&self) -> ContentWorkflow {
        self.inner.lock().await.clone()
    }

    pub async fn state(&self) -> Option<LifecycleState> {
        self.inner.lock().await.state()
    }

    /// Discard the current item and any pending call. The persisted history
    /// is kept.
    pub async fn reset(&self) {
        self.inner.lock().await.reset();
    }

    /// Generate new content. The result becomes the current item.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<ContentItem> {
        let mut guard = self.begin(|wf| wf.begin_generation(request)).await?;
        let outcome = self.bounded(self.service.generate_content(request)).await;

        let mut workflow = self.inner.lock().await;
        let call = guard.disarm()?;
        workflow.complete_generation(call, outcome).cloned()
    }

    pub async fn open_preview(&self) -> Result<ContentItem> {
        self.inner.lock().await.open_preview().cloned()
    }

    pub async fn close_preview(&self) -> Result<ContentItem> {
        self.inner.lock().await.close_preview().cloned()
    }

    pub async fn retry(&self) -> Result<ContentItem> {
        self.inner.lock().await.retry().cloned()
    }

    /// Save the previewed item.
    pub async fn save(&self) -> Result<ContentItem> {
        let mut guard = self.begin(ContentWorkflow::begin_save).await?;
        let outcome = match guard.call().and_then(PendingCall::content) {
            Some(content) => self.bounded(self.service.save_content(content)).await,
            None => Err(ServiceError::rejected("no content to save")),
        };

        let mut workflow = self.inner.lock().await;
        let call = guard.disarm()?;
        workflow.complete_save(call, outcome).cloned()
    }

    /// Schedule the previewed item, validating the date against today's
    /// local date.
    pub async fn schedule(&self, request: &ScheduleRequest) -> Result<ContentItem> {
        self.schedule_on(request, Local::now().date_naive()).await
    }

    /// [`WorkflowHandle::schedule`] with an explicit "today".
    pub async fn schedule_on(&self, request: &ScheduleRequest, today: NaiveDate) -> Result<ContentItem> {
        let mut guard = self.begin(|wf| wf.begin_schedule(request, today)).await?;
        let pending = guard.call();
        let outcome = match (
            pending.and_then(PendingCall::content),
            pending.and_then(PendingCall::publish_time),
        ) {
            (Some(content), Some(publish_time)) => {
                self.bounded(self.service.schedule_content(content, publish_time))
                    .await
            }
            _ => Err(ServiceError::rejected("no content to schedule")),
        };

        let mut workflow = self.inner.lock().await;
        let call = guard.disarm()?;
        workflow.complete_schedule(call, outcome).cloned()
    }

    async fn begin(
        &self,
        start: impl FnOnce(&mut ContentWorkflow) -> Result<PendingCall>,
    ) -> Result<CallGuard> {
        let call = start(&mut *self.inner.lock().await)?;
        Ok(CallGuard {
            inner: Arc::clone(&self.inner),
            operation: call.operation(),
            call: Some(call),
        })
    }

    async fn bounded<T>(&self, call: impl Future<Output = ServiceResult<T>>) -> ServiceResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "service call timed out");
                Err(ServiceError::TimedOut)
            }
        }
    }
}

// ============================================================================
// Call Guard
// ============================================================================

/// Owns a [`PendingCall`] while its service call runs. If the driving future
/// is dropped before [`CallGuard::disarm`], the call is aborted and the item
/// goes back to its pre-call state.
struct CallGuard {
    inner: Arc<Mutex<ContentWorkflow>>,
    operation: Operation,
    call: Option<PendingCall>,
}

impl CallGuard {
    fn call(&self) -> Option<&PendingCall> {
        self.call.as_ref()
    }

    fn disarm(&mut self) -> Result<PendingCall> {
        self.call.take().ok_or(WorkflowError::Cancelled {
            operation: self.operation,
        })
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        let Some(call) = self.call.take() else {
            return;
        };
        tracing::info!(operation = %self.operation, "caller went away mid-call, aborting");

        if let Ok(mut workflow) = self.inner.try_lock() {
            workflow.abort(call);
            return;
        }
        // Lock is busy; finish the abort on the runtime.
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let inner = Arc::clone(&self.inner);
                runtime.spawn(async move {
                    inner.lock().await.abort(call);
                });
            }
            Err(_) => tracing::warn!(
                operation = %self.operation,
                "no runtime to abort the dropped call; reset the workflow to recover"
            ),
        }
    }
}

impl std::fmt::Debug for WorkflowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowHandle")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

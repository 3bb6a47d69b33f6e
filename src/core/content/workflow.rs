//! Content Lifecycle Workflow
//!
//! Synchronous state machine for one content item. Every external call is
//! split in two: a `begin_*` method validates the trigger and hands back a
//! [`PendingCall`], the caller performs the service call, and the matching
//! `complete_*` method (or [`ContentWorkflow::abort`]) applies the outcome.
//!
//! Rules:
//! - Only one call may be pending at a time; any further trigger gets
//!   `OperationInProgress`.
//! - A rejected trigger (validation, illegal edge, in progress) leaves the
//!   state untouched.
//! - A failed external call moves the item to `Failed`.
//! - A cancelled call restores the pre-call state.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::errors::{Result, WorkflowError};
use super::types::{
    ContentItem, GenerationRequest, LifecycleState, Operation, OperationStatus, ScheduleRequest,
};
use crate::core::service::{GeneratedContent, SaveReceipt, ScheduledContent, ServiceError, ServiceResult};

/// Rejection message when generation "succeeds" without any text.
pub const EMPTY_CONTENT_MESSAGE: &str = "service returned no content";

// ============================================================================
// Pending Call
// ============================================================================

/// Token for an external call started by a `begin_*` method.
///
/// Not `Clone`: each begun call is completed or aborted exactly once.
#[derive(Debug)]
#[must_use = "a pending call must be completed or aborted"]
pub struct PendingCall {
    operation: Operation,
    /// Matches the workflow's pending ticket until the call is settled.
    ticket: u64,
    /// State to restore if the call is aborted. `None` when the call did not
    /// change the item's state (generation).
    prior_state: Option<LifecycleState>,
    request: Option<GenerationRequest>,
    content: Option<ContentItem>,
    publish_time: Option<NaiveDateTime>,
}

impl PendingCall {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Generation parameters (`Generate` only).
    pub fn request(&self) -> Option<&GenerationRequest> {
        self.request.as_ref()
    }

    /// Snapshot of the item to send (`Save` and `Schedule`).
    pub fn content(&self) -> Option<&ContentItem> {
        self.content.as_ref()
    }

    /// Composed publish timestamp (`Schedule` only).
    pub fn publish_time(&self) -> Option<NaiveDateTime> {
        self.publish_time
    }
}

// ============================================================================
// Workflow
// ============================================================================

/// Lifecycle of the current content item plus the history of persisted ones.
#[derive(Debug, Clone)]
pub struct ContentWorkflow {
    id: Uuid,
    item: Option<ContentItem>,
    generate: OperationStatus,
    save: OperationStatus,
    schedule: OperationStatus,
    last_error: Option<WorkflowError>,
    /// Number of calls begun so far; the latest one is the only one that may settle.
    calls: u64,
    pending: Option<u64>,
    /// Saved and scheduled items, in persistence order (newest last).
    persisted: Vec<ContentItem>,
}

impl Default for ContentWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentWorkflow {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            item: None,
            generate: OperationStatus::default(),
            save: OperationStatus::default(),
            schedule: OperationStatus::default(),
            last_error: None,
            calls: 0,
            pending: None,
            persisted: Vec::new(),
        }
    }

    /// Drop the current item and all operation tracking. Any call still
    /// outstanding can no longer settle. The persisted history is kept.
    pub fn reset(&mut self) {
        tracing::info!(workflow = %self.id, state = ?self.state(), "workflow reset");
        self.item = None;
        self.generate = OperationStatus::default();
        self.save = OperationStatus::default();
        self.schedule = OperationStatus::default();
        self.last_error = None;
        self.pending = None;
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn item(&self) -> Option<&ContentItem> {
        self.item.as_ref()
    }

    /// Current lifecycle state, `None` before the first generation.
    pub fn state(&self) -> Option<LifecycleState> {
        self.item.as_ref().map(|i| i.lifecycle_state)
    }

    pub fn status(&self, operation: Operation) -> &OperationStatus {
        match operation {
            Operation::Generate => &self.generate,
            Operation::Save => &self.save,
            Operation::Schedule => &self.schedule,
        }
    }

    /// The operation currently waiting on the service, if any.
    pub fn in_flight(&self) -> Option<Operation> {
        Operation::all()
            .iter()
            .copied()
            .find(|op| self.status(*op).in_flight)
    }

    /// Most recent error from any external call.
    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    /// Saved and scheduled items in the order they were persisted.
    pub fn persisted(&self) -> &[ContentItem] {
        &self.persisted
    }

    /// Scheduled items only, in the order they were scheduled.
    pub fn scheduled(&self) -> impl Iterator<Item = &ContentItem> {
        self.persisted
            .iter()
            .filter(|i| i.lifecycle_state == LifecycleState::Scheduled)
    }

    // ------------------------------------------------------------------------
    // Local transitions
    // ------------------------------------------------------------------------

    /// Draft -> Previewing. The draft must have text.
    pub fn open_preview(&mut self) -> Result<&ContentItem> {
        let item = self.item_in(LifecycleState::Draft, "open preview")?;
        if !item.has_text() {
            return Err(WorkflowError::validation("text", "nothing to preview"));
        }
        self.transition(LifecycleState::Previewing)
    }

    /// Previewing -> Draft.
    pub fn close_preview(&mut self) -> Result<&ContentItem> {
        self.item_in(LifecycleState::Previewing, "close preview")?;
        self.transition(LifecycleState::Draft)
    }

    /// Failed -> Draft.
    pub fn retry(&mut self) -> Result<&ContentItem> {
        self.guard_idle()?;
        self.item_in(LifecycleState::Failed, "retry")?;
        self.last_error = None;
        self.transition(LifecycleState::Draft)
    }

    // ------------------------------------------------------------------------
    // Generate
    // ------------------------------------------------------------------------

    /// Start a generation. Allowed from every state that is not waiting on
    /// the service, including before any item exists.
    pub fn begin_generation(&mut self, request: &GenerationRequest) -> Result<PendingCall> {
        self.guard_idle()?;
        request.validate()?;

        Ok(PendingCall {
            operation: Operation::Generate,
            ticket: self.mark_in_flight(Operation::Generate),
            prior_state: None,
            request: Some(request.clone()),
            content: None,
            publish_time: None,
        })
    }

    /// Apply the outcome of `generate_content`.
    ///
    /// Success replaces the current item with a fresh `Draft`. Failure marks
    /// an editable item `Failed` (its previous text is kept), or creates a
    /// `Failed` placeholder when there is nothing editable.
    pub fn complete_generation(
        &mut self,
        call: PendingCall,
        outcome: ServiceResult<GeneratedContent>,
    ) -> Result<&ContentItem> {
        self.expect_pending(&call, Operation::Generate)?;
        let Some(request) = call.request else {
            return Err(WorkflowError::Cancelled {
                operation: Operation::Generate,
            });
        };

        let outcome = outcome.and_then(|generated| {
            if generated.text.trim().is_empty() {
                Err(ServiceError::rejected(EMPTY_CONTENT_MESSAGE))
            } else {
                Ok(generated)
            }
        });

        match outcome {
            Ok(generated) => {
                self.clear_in_flight(Operation::Generate, None);
                tracing::info!(
                    workflow = %self.id,
                    topic = %request.topic,
                    content_type = %request.content_type,
                    "content generated"
                );
                let item = self
                    .item
                    .insert(ContentItem::draft(&request, generated.id, generated.text));
                Ok(&*item)
            }
            Err(err) if err.is_cancellation() => Err(self.cancel(Operation::Generate, None)),
            Err(err) => {
                let err = WorkflowError::from_service(Operation::Generate, err);
                self.clear_in_flight(Operation::Generate, Some(err.clone()));
                tracing::warn!(workflow = %self.id, error = %err, "content generation failed");

                let editable = self
                    .state()
                    .is_some_and(|state| !state.is_terminal() && !state.is_pending());
                if !editable {
                    self.item = Some(ContentItem::failed(&request));
                }
                self.transition(LifecycleState::Failed)?;
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------------

    /// Previewing -> Saving.
    pub fn begin_save(&mut self) -> Result<PendingCall> {
        self.guard_idle()?;
        let content = self.item_in(LifecycleState::Previewing, "save")?.clone();

        self.transition(LifecycleState::Saving)?;
        Ok(PendingCall {
            operation: Operation::Save,
            ticket: self.mark_in_flight(Operation::Save),
            prior_state: Some(LifecycleState::Previewing),
            request: None,
            content: Some(content),
            publish_time: None,
        })
    }

    /// Saving -> Saved on success, Saving -> Failed otherwise.
    pub fn complete_save(
        &mut self,
        call: PendingCall,
        outcome: ServiceResult<SaveReceipt>,
    ) -> Result<&ContentItem> {
        self.expect_pending(&call, Operation::Save)?;

        match outcome {
            Ok(receipt) => {
                self.clear_in_flight(Operation::Save, None);
                if let (Some(item), Some(id)) = (self.item.as_mut(), receipt.id) {
                    item.id = Some(id);
                }
                self.transition(LifecycleState::Saved)?;
                self.record_persisted();
                tracing::info!(workflow = %self.id, "content saved");
                self.current()
            }
            Err(err) if err.is_cancellation() => Err(self.cancel(Operation::Save, call.prior_state)),
            Err(err) => Err(self.fail(Operation::Save, err)),
        }
    }

    // ------------------------------------------------------------------------
    // Schedule
    // ------------------------------------------------------------------------

    /// Previewing -> Scheduling. The date and time must both be set and the
    /// date must not be before `today`.
    pub fn begin_schedule(&mut self, request: &ScheduleRequest, today: NaiveDate) -> Result<PendingCall> {
        self.guard_idle()?;
        let content = self.item_in(LifecycleState::Previewing, "schedule")?.clone();
        let publish_time = request.publish_time(today)?;

        self.transition(LifecycleState::Scheduling)?;
        Ok(PendingCall {
            operation: Operation::Schedule,
            ticket: self.mark_in_flight(Operation::Schedule),
            prior_state: Some(LifecycleState::Previewing),
            request: None,
            content: Some(content),
            publish_time: Some(publish_time),
        })
    }

    /// Scheduling -> Scheduled on success, Scheduling -> Failed otherwise.
    pub fn complete_schedule(
        &mut self,
        call: PendingCall,
        outcome: ServiceResult<ScheduledContent>,
    ) -> Result<&ContentItem> {
        self.expect_pending(&call, Operation::Schedule)?;

        match outcome {
            Ok(scheduled) => {
                self.clear_in_flight(Operation::Schedule, None);
                if let Some(item) = self.item.as_mut() {
                    item.id = Some(scheduled.id);
                    // Keep the requested timestamp; the service echo is informational.
                    item.scheduled_for = call.publish_time;
                }
                self.transition(LifecycleState::Scheduled)?;
                self.record_persisted();
                tracing::info!(
                    workflow = %self.id,
                    publish_time = ?call.publish_time,
                    "content scheduled"
                );
                self.current()
            }
            Err(err) if err.is_cancellation() => Err(self.cancel(Operation::Schedule, call.prior_state)),
            Err(err) => Err(self.fail(Operation::Schedule, err)),
        }
    }

    // ------------------------------------------------------------------------
    // Cancellation
    // ------------------------------------------------------------------------

    /// Abandon a pending call and restore the pre-call state. Returns the
    /// `Cancelled` error that was recorded.
    pub fn abort(&mut self, call: PendingCall) -> WorkflowError {
        if let Err(err) = self.expect_pending(&call, call.operation) {
            return err;
        }
        self.cancel(call.operation, call.prior_state)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn current(&self) -> Result<&ContentItem> {
        self.item
            .as_ref()
            .ok_or_else(|| WorkflowError::validation("content", "no content generated yet"))
    }

    /// The current item, if it is in `expected`.
    fn item_in(&self, expected: LifecycleState, trigger: &str) -> Result<&ContentItem> {
        let item = self.current()?;
        if item.lifecycle_state != expected {
            return Err(WorkflowError::invalid_transition(item.lifecycle_state, trigger));
        }
        Ok(item)
    }

    fn guard_idle(&self) -> Result<()> {
        match self.in_flight() {
            Some(operation) => Err(WorkflowError::OperationInProgress { operation }),
            None => Ok(()),
        }
    }

    fn expect_pending(&self, call: &PendingCall, operation: Operation) -> Result<()> {
        if call.operation != operation
            || self.pending != Some(call.ticket)
            || !self.status(operation).in_flight
        {
            return Err(WorkflowError::Cancelled { operation });
        }
        Ok(())
    }

    fn status_mut(&mut self, operation: Operation) -> &mut OperationStatus {
        match operation {
            Operation::Generate => &mut self.generate,
            Operation::Save => &mut self.save,
            Operation::Schedule => &mut self.schedule,
        }
    }

    /// Returns the ticket of the new call.
    fn mark_in_flight(&mut self, operation: Operation) -> u64 {
        tracing::debug!(workflow = %self.id, %operation, "operation started");
        let status = self.status_mut(operation);
        status.in_flight = true;
        status.last_error = None;
        self.calls += 1;
        self.pending = Some(self.calls);
        self.calls
    }

    fn clear_in_flight(&mut self, operation: Operation, error: Option<WorkflowError>) {
        self.pending = None;
        let status = self.status_mut(operation);
        status.in_flight = false;
        status.last_error = error.clone();
        if error.is_some() {
            self.last_error = error;
        }
    }

    fn transition(&mut self, to: LifecycleState) -> Result<&ContentItem> {
        let id = self.id;
        let item = self
            .item
            .as_mut()
            .ok_or_else(|| WorkflowError::validation("content", "no content generated yet"))?;
        tracing::debug!(workflow = %id, from = %item.lifecycle_state, %to, "lifecycle transition");
        item.lifecycle_state = to;
        Ok(&*item)
    }

    fn fail(&mut self, operation: Operation, err: ServiceError) -> WorkflowError {
        let err = WorkflowError::from_service(operation, err);
        tracing::warn!(workflow = %self.id, %operation, error = %err, "operation failed");
        self.clear_in_flight(operation, Some(err.clone()));
        if let Some(item) = self.item.as_mut() {
            item.lifecycle_state = LifecycleState::Failed;
        }
        err
    }

    fn cancel(&mut self, operation: Operation, prior_state: Option<LifecycleState>) -> WorkflowError {
        let err = WorkflowError::Cancelled { operation };
        tracing::warn!(workflow = %self.id, %operation, "operation cancelled");
        self.clear_in_flight(operation, Some(err.clone()));
        if let (Some(item), Some(state)) = (self.item.as_mut(), prior_state) {
            item.lifecycle_state = state;
        }
        err
    }

    fn record_persisted(&mut self) {
        if let Some(item) = &self.item {
            self.persisted.push(item.clone());
        }
    }
}

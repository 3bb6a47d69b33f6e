//! Content Lifecycle
//!
//! Takes generated content from creation through optional preview to a
//! saved or scheduled terminal state.
//!
//! - `types`: content items, lifecycle states and operator requests
//! - `workflow`: the synchronous state machine (`begin_*` / `complete_*`)
//! - `handle`: async driver running the workflow against a `ContentService`
//! - `errors`: `WorkflowError`

pub mod errors;
pub mod handle;
pub mod types;
pub mod workflow;

pub use errors::{Result, WorkflowError};
pub use handle::WorkflowHandle;
pub use types::{
    ContentItem, ContentType, GenerationRequest, LifecycleState, Operation, OperationStatus,
    ScheduleRequest, SCHEDULE_DATE_FORMAT,
};
pub use workflow::{ContentWorkflow, PendingCall, EMPTY_CONTENT_MESSAGE};

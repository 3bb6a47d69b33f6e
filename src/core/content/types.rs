//! Content Domain Types
//!
//! - [`ContentItem`]: one generated piece of content and its lifecycle state
//! - [`LifecycleState`]: states of the content state machine
//! - [`GenerationRequest`] / [`ScheduleRequest`]: operator input, validated
//!   before any service call is made
//! - [`Operation`] / [`OperationStatus`]: per-operation loading and error tracking

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{Result, WorkflowError};

/// Date format accepted by [`ScheduleRequest`].
pub const SCHEDULE_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Content Type
// ============================================================================

/// Kind of content to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Post,
    Story,
    Reply,
    Comment,
    Message,
    Bio,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Story => "story",
            Self::Reply => "reply",
            Self::Comment => "comment",
            Self::Message => "message",
            Self::Bio => "bio",
        }
    }

    pub fn all() -> &'static [ContentType] {
        &[
            Self::Post,
            Self::Story,
            Self::Reply,
            Self::Comment,
            Self::Message,
            Self::Bio,
        ]
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| WorkflowError::validation("content_type", format!("unknown content type '{s}'")))
    }
}

// ============================================================================
// Lifecycle State
// ============================================================================

/// State of a [`ContentItem`].
///
/// ```text
/// (none) ─generate─▶ Draft ◀──close──▶ Previewing ─save────▶ Saving ─────▶ Saved
///    │                 ▲                   │                   │
///    │                 │retry              └─schedule─▶ Scheduling ─▶ Scheduled
///    └─failure──▶ Failed ◀──────────── any failed call ───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Draft,
    Previewing,
    Saving,
    Scheduling,
    Saved,
    Scheduled,
    Failed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Previewing => "previewing",
            Self::Saving => "saving",
            Self::Scheduling => "scheduling",
            Self::Saved => "saved",
            Self::Scheduled => "scheduled",
            Self::Failed => "failed",
        }
    }

    /// Persisted states. The item is read-only from here on.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Saved | Self::Scheduled)
    }

    /// States that wait on a service call.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Saving | Self::Scheduling)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Parameters for `generate_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    pub content_type: ContentType,
    /// Free-form tone hint (`casual`, `passionate`, ...).
    pub tone: String,
    pub word_count: u32,
    pub include_hashtags: bool,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, content_type: ContentType, tone: impl Into<String>, word_count: u32) -> Self {
        Self {
            topic: topic.into(),
            content_type,
            tone: tone.into(),
            word_count,
            include_hashtags: false,
        }
    }

    pub fn with_hashtags(mut self, include_hashtags: bool) -> Self {
        self.include_hashtags = include_hashtags;
        self
    }

    /// Topic must be non-blank and the word count positive.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(WorkflowError::validation("topic", "must not be empty"));
        }
        if self.word_count == 0 {
            return Err(WorkflowError::validation("word_count", "must be greater than zero"));
        }
        Ok(())
    }
}

/// Schedule form input, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`
    pub time: Option<String>,
}

impl ScheduleRequest {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            time: Some(time.into()),
        }
    }

    /// Compose the publish timestamp.
    ///
    /// Both fields must be set and parse, and the date must not be before
    /// `today`. A time earlier today is accepted; only the date is checked.
    pub fn publish_time(&self, today: NaiveDate) -> Result<NaiveDateTime> {
        let date = non_blank(self.date.as_deref())
            .ok_or_else(|| WorkflowError::validation("date", "must be set"))?;
        let time = non_blank(self.time.as_deref())
            .ok_or_else(|| WorkflowError::validation("time", "must be set"))?;

        let date = NaiveDate::parse_from_str(date, SCHEDULE_DATE_FORMAT)
            .map_err(|e| WorkflowError::validation("date", format!("'{date}' is not YYYY-MM-DD: {e}")))?;
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|e| WorkflowError::validation("time", format!("'{time}' is not HH:MM: {e}")))?;

        if date < today {
            return Err(WorkflowError::validation(
                "date",
                format!("{date} is in the past"),
            ));
        }

        Ok(date.and_time(time))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// Content Item
// ============================================================================

/// A generated piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Assigned by the service on create, save or schedule.
    pub id: Option<String>,
    pub text: String,
    pub topic: String,
    pub tone: String,
    pub content_type: ContentType,
    pub lifecycle_state: LifecycleState,
    /// Set only once the item is `Scheduled`.
    pub scheduled_for: Option<NaiveDateTime>,
    pub generated_at: DateTime<Utc>,
}

impl ContentItem {
    /// A fresh `Draft` from a generation request and the service's text.
    pub fn draft(request: &GenerationRequest, id: Option<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            topic: request.topic.clone(),
            tone: request.tone.clone(),
            content_type: request.content_type,
            lifecycle_state: LifecycleState::Draft,
            scheduled_for: None,
            generated_at: Utc::now(),
        }
    }

    /// Placeholder for a generation that never produced text.
    pub fn failed(request: &GenerationRequest) -> Self {
        Self {
            lifecycle_state: LifecycleState::Failed,
            ..Self::draft(request, None, String::new())
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

// ============================================================================
// Operations
// ============================================================================

/// External calls the workflow makes, tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Generate,
    Save,
    Schedule,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Save => "save",
            Self::Schedule => "schedule",
        }
    }

    pub fn all() -> &'static [Operation] {
        &[Self::Generate, Self::Save, Self::Schedule]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loading flag and last error for one [`Operation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStatus {
    pub in_flight: bool,
    pub last_error: Option<WorkflowError>,
}

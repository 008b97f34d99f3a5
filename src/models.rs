//! Task model types for the to-do store.

use crate::error::{Error, Result};
use crate::id::generate_task_id;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Task priority levels (0 = most important).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Priority {
    /// High priority.
    High = 0,
    /// Medium priority (default).
    #[default]
    Medium = 1,
    /// Low priority.
    Low = 2,
}

impl Priority {
    /// Parse a priority from a string, defaulting to `Medium` for anything
    /// unrecognized. Stored data from earlier app versions used free-form
    /// priority strings, so this never fails.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, immutable after creation.
    pub id: String,
    /// Short title. Never empty after a successful create or update.
    pub title: String,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due date and time of day.
    pub due: DateTime<Utc>,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Completion flag. Flipped only by the toggle operation.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a task with a freshly generated id.
    ///
    /// The title is trimmed; leading and trailing whitespace never reaches
    /// storage.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the title is empty after trimming.
    pub fn new(
        title: &str,
        description: Option<&str>,
        due: DateTime<Utc>,
        priority: Priority,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation("empty title".to_string()));
        }

        Ok(Self {
            id: generate_task_id(),
            title: title.to_string(),
            description: description.map(ToString::to_string),
            due,
            priority,
            completed: false,
        })
    }

    /// Whether the due date falls on the same local calendar day as `now`.
    ///
    /// Computed on demand rather than stored, so the answer never drifts
    /// when the app stays open across midnight.
    #[must_use]
    pub fn is_due_today(&self, now: DateTime<Local>) -> bool {
        self.due.with_timezone(&now.timezone()).date_naive() == now.date_naive()
    }
}

/// Fields that can be updated on a task. `None` fields are left untouched;
/// the id is never updatable.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    /// New title (if Some).
    pub title: Option<String>,
    /// New description (if Some).
    pub description: Option<String>,
    /// New due date (if Some).
    pub due: Option<DateTime<Utc>>,
    /// New priority (if Some).
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due.is_none()
            && self.priority.is_none()
    }
}

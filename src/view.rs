//! Pure filter/sort projections over the task collection.
//!
//! The store keeps tasks in insertion order; presentation order comes
//! exclusively from [`project`]. Criteria combine with AND semantics, and
//! both sorts are stable so ties keep collection order.

use crate::models::{Priority, Task};
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Date window matched against the local calendar day of a task's due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    /// Match every task.
    #[default]
    Any,
    /// Match tasks due on exactly this day.
    OnDay(NaiveDate),
    /// Match tasks due between two days, inclusive.
    Between(NaiveDate, NaiveDate),
    /// Match tasks due on or after this day.
    From(NaiveDate),
    /// Match tasks due on or before this day.
    Until(NaiveDate),
}

impl DateFilter {
    fn matches(self, day: NaiveDate) -> bool {
        match self {
            Self::Any => true,
            Self::OnDay(d) => day == d,
            Self::Between(from, to) => day >= from && day <= to,
            Self::From(d) => day >= d,
            Self::Until(d) => day <= d,
        }
    }
}

/// Priority filter for projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    /// Match every priority.
    #[default]
    Any,
    /// Match a single priority level.
    Only(Priority),
}

impl PriorityFilter {
    fn matches(self, priority: Priority) -> bool {
        match self {
            Self::Any => true,
            Self::Only(p) => priority == p,
        }
    }
}

/// Sort order for projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ascending by due date.
    #[default]
    Time,
    /// High before medium before low.
    Priority,
}

/// Filter and sort criteria, all optional, combined with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct ViewCriteria {
    /// Exclude completed tasks.
    pub hide_completed: bool,
    /// Date window over the due date.
    pub date: DateFilter,
    /// Case-insensitive substring over title or description; empty matches
    /// everything.
    pub search: String,
    /// Priority filter.
    pub priority: PriorityFilter,
    /// Sort order.
    pub sort: SortKey,
}

fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&needle))
}

fn local_day(due: DateTime<Utc>) -> NaiveDate {
    due.with_timezone(&Local).date_naive()
}

/// Compute a filtered, sorted projection of `tasks`.
///
/// Pure: the input is never mutated, and identical inputs yield identical
/// output.
#[must_use]
pub fn project(tasks: &[Task], criteria: &ViewCriteria) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|task| !(criteria.hide_completed && task.completed))
        .filter(|task| criteria.date.matches(local_day(task.due)))
        .filter(|task| matches_search(task, &criteria.search))
        .filter(|task| criteria.priority.matches(task.priority))
        .cloned()
        .collect();

    // Vec::sort_by_key is stable, which the priority sort relies on.
    match criteria.sort {
        SortKey::Time => out.sort_by_key(|task| task.due),
        SortKey::Priority => out.sort_by_key(|task| task.priority),
    }

    out
}

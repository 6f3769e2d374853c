//! Core data types for the analysis engine.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied task identifier.
///
/// Ids arrive either as JSON integers or strings. The derived ordering puts
/// every numeric id before every string id, numbers compare numerically and
/// strings lexicographically. Output ordering and tie-breaks use this order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Num(i64),
    Name(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Num(n) => write!(f, "{}", n),
            TaskId::Name(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Num(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Name(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Name(s)
    }
}

/// Progress status of a task.
///
/// Unrecognized labels are carried through verbatim in `Other`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Delayed,
    Other(String),
}

impl TaskStatus {
    /// Normalize a free-form status label (English or French aliases).
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "completed" | "complete" | "done" | "finished" | "terminee" | "terminé"
            | "terminée" => TaskStatus::Completed,
            "in_progress" | "in progress" | "ongoing" | "en_cours" | "en cours" => {
                TaskStatus::InProgress
            }
            "not_started" | "not started" | "todo" | "to_do" | "to do" | "planned"
            | "non_commencee" | "non commencé" => TaskStatus::NotStarted,
            "delayed" | "late" | "overdue" | "en_retard" | "en retard" => TaskStatus::Delayed,
            _ => TaskStatus::Other(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Delayed => "delayed",
            TaskStatus::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(label: String) -> Self {
        TaskStatus::parse(&label)
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A validated task.
///
/// `duration` is the effective duration: already defaulted and rounded up to
/// whole units by the graph builder. `predecessors` only holds ids that
/// resolve inside the owning graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: Option<String>,
    pub duration: i64,
    pub duration_unit: Option<String>,
    pub predecessors: Vec<TaskId>,
    pub resources: Vec<String>,
    pub status: TaskStatus,
}

impl Task {
    /// Create a task with the given id and effective duration.
    pub fn new(id: impl Into<TaskId>, duration: i64) -> Self {
        let id = id.into();
        Self {
            name: format!("Task {}", id),
            id,
            description: None,
            duration: effective_duration(Some(duration as f64)),
            duration_unit: None,
            predecessors: Vec::new(),
            resources: Vec::new(),
            status: TaskStatus::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_predecessors<I, T>(mut self, predecessors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.predecessors = predecessors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.duration_unit = Some(unit.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Largest effective duration of a single task.
///
/// Sums of durations over any task set that fits in memory stay well inside
/// `i64`, so offsets and totals never overflow.
pub const MAX_DURATION: i64 = 1_000_000_000;

/// Effective duration of a raw duration value.
///
/// Missing, non-finite and non-positive values become 1; fractional values
/// round up to the next whole unit; values above [`MAX_DURATION`] are clamped.
pub fn effective_duration(raw: Option<f64>) -> i64 {
    match raw {
        Some(d) if d.is_finite() && d > 0.0 => (d.ceil().min(MAX_DURATION as f64) as i64).max(1),
        _ => 1,
    }
}

/// Calendar date at `offset` units after `start` (one unit = one day).
pub(crate) fn date_at(start: NaiveDate, offset: i64) -> NaiveDate {
    start
        .checked_add_days(Days::new(offset.max(0) as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// One row of the time-phased schedule.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub id: TaskId,
    pub name: String,
    pub start_offset: i64,
    pub end_offset: i64,
    pub duration: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TaskStatus,
    pub dependencies: Vec<TaskId>,
    pub resources: Vec<String>,
    pub description: Option<String>,
}

/// Earliest-start schedule for a whole project, ordered by task id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Schedule {
    pub start_date: NaiveDate,
    #[serde(rename = "tasks")]
    pub entries: Vec<ScheduleEntry>,
    /// Largest end offset over all entries (0 for an empty schedule).
    pub project_end_offset: i64,
    /// Tasks placed at offset 0 because they sit in or behind a cycle.
    pub forced: Vec<TaskId>,
}

impl Schedule {
    pub fn entry(&self, id: &TaskId) -> Option<&ScheduleEntry> {
        self.entries
            .binary_search_by(|e| e.id.cmp(id))
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn end_date(&self) -> NaiveDate {
        date_at(self.start_date, self.project_end_offset)
    }
}

//! Non-fatal structural anomalies and the fallback applied for each.

use serde::Serialize;
use std::fmt;

use crate::models::{TaskId, MAX_DURATION};

/// A fallback the engine applied instead of failing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A predecessor id that names no task; the reference was dropped.
    DanglingReference { task: TaskId, missing: TaskId },
    /// Duration missing or not positive; replaced by the default of 1.
    DefaultedDuration { task: TaskId, raw: Option<f64> },
    /// Duration above the supported maximum; clamped to it.
    ClampedDuration { task: TaskId, raw: f64 },
    /// Several records shared this id; the last one was kept.
    DuplicateId { task: TaskId },
    /// Task sits in or behind a dependency cycle; scheduled at offset 0.
    ForcedSchedule { task: TaskId },
    /// Task sits in or behind a dependency cycle; left out of the longest-path search.
    ExcludedFromCriticalPath { task: TaskId },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DanglingReference { task, missing } => {
                write!(f, "task {} depends on unknown task {}, dependency ignored", task, missing)
            }
            Diagnostic::DefaultedDuration { task, raw } => match raw {
                Some(raw) => write!(f, "task {} has invalid duration {}, using 1", task, raw),
                None => write!(f, "task {} has no duration, using 1", task),
            },
            Diagnostic::ClampedDuration { task, raw } => write!(
                f,
                "task {} has duration {} above the maximum, using {}",
                task,
                raw,
                MAX_DURATION
            ),
            Diagnostic::DuplicateId { task } => {
                write!(f, "task id {} appears more than once, last record kept", task)
            }
            Diagnostic::ForcedSchedule { task } => {
                write!(f, "task {} is part of a dependency cycle, scheduled at project start", task)
            }
            Diagnostic::ExcludedFromCriticalPath { task } => {
                write!(f, "task {} is part of a dependency cycle, excluded from critical path", task)
            }
        }
    }
}

//! Mutable bookkeeping for one forward pass.

use std::collections::VecDeque;

use crate::index::TaskIdx;

/// Per-task offsets and the ready queue of a forward pass.
///
/// Indexed by dense task index. Lives only for the duration of one
/// [`super::ForwardScheduler::schedule`] call.
#[derive(Clone, Debug)]
pub struct SchedulerState {
    /// (start, end) offset per task; `None` until scheduled.
    pub offsets: Vec<Option<(i64, i64)>>,
    /// Whether a task is currently waiting in `ready`.
    pub queued: Vec<bool>,
    /// Tasks whose predecessors are all scheduled.
    pub ready: VecDeque<TaskIdx>,
}

impl SchedulerState {
    pub fn new(task_count: usize) -> Self {
        Self {
            offsets: vec![None; task_count],
            queued: vec![false; task_count],
            ready: VecDeque::with_capacity(task_count),
        }
    }

    /// Enqueue a task unless it is already queued or scheduled.
    ///
    /// Returns whether the task was added.
    pub fn enqueue(&mut self, idx: TaskIdx) -> bool {
        let i = idx as usize;
        if self.queued[i] || self.offsets[i].is_some() {
            return false;
        }
        self.queued[i] = true;
        self.ready.push_back(idx);
        true
    }

    pub fn next_ready(&mut self) -> Option<TaskIdx> {
        let idx = self.ready.pop_front()?;
        self.queued[idx as usize] = false;
        Some(idx)
    }

    pub fn record(&mut self, idx: TaskIdx, start: i64, end: i64) {
        self.offsets[idx as usize] = Some((start, end));
    }

    #[inline]
    pub fn is_scheduled(&self, idx: TaskIdx) -> bool {
        self.offsets[idx as usize].is_some()
    }

    /// End offset of a task, or 0 if it has not been scheduled yet.
    #[inline]
    pub fn end_or_zero(&self, idx: TaskIdx) -> i64 {
        self.offsets[idx as usize].map(|(_, end)| end).unwrap_or(0)
    }

    pub fn unscheduled(&self) -> impl Iterator<Item = TaskIdx> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_none())
            .map(|(i, _)| i as TaskIdx)
    }
}

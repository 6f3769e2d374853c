//! Earliest-start propagation over the task graph.

use chrono::NaiveDate;

use crate::graph::TaskGraph;
use crate::index::TaskIdx;
use crate::models::{date_at, Schedule, ScheduleEntry, TaskId};
use crate::{log_changes, log_checks, log_debug};

use super::state::SchedulerState;

/// Forward pass over one immutable graph snapshot.
pub struct ForwardScheduler<'a> {
    graph: &'a TaskGraph,
    verbosity: u8,
}

impl<'a> ForwardScheduler<'a> {
    pub fn new(graph: &'a TaskGraph) -> Self {
        Self {
            graph,
            verbosity: 0,
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Compute the earliest-start schedule.
    ///
    /// 1. Seed the ready queue with every task that has no predecessors.
    /// 2. A dequeued task starts at the latest end among its predecessors
    ///    (an unscheduled predecessor counts as 0) and ends `duration` later.
    /// 3. A successor is enqueued once all of its predecessors are scheduled.
    /// 4. Whatever the queue never reached is placed at offset 0.
    pub fn schedule(&self, start_date: NaiveDate) -> Schedule {
        let mut state = SchedulerState::new(self.graph.len());

        for idx in self.graph.indices() {
            if self.graph.predecessors(idx).is_empty() {
                state.enqueue(idx);
            }
        }

        while let Some(idx) = state.next_ready() {
            let start = self.earliest_start(&state, idx);
            let end = start.saturating_add(self.graph.duration(idx));
            state.record(idx, start, end);
            log_debug!(
                self.verbosity,
                "scheduled {} at [{}, {})",
                self.graph.task(idx).id,
                start,
                end
            );

            for &succ in self.graph.successors(idx) {
                if state.is_scheduled(succ) {
                    continue;
                }
                let ready = self
                    .graph
                    .predecessors(succ)
                    .iter()
                    .all(|&p| state.is_scheduled(p));
                if ready && state.enqueue(succ) {
                    log_checks!(
                        self.verbosity,
                        "{} ready after {}",
                        self.graph.task(succ).id,
                        self.graph.task(idx).id
                    );
                }
            }
        }

        let forced: Vec<TaskIdx> = state.unscheduled().collect();
        for &idx in &forced {
            state.record(idx, 0, self.graph.duration(idx));
        }
        if !forced.is_empty() {
            log_changes!(
                self.verbosity,
                "{} task(s) unreachable through dependencies, placed at offset 0",
                forced.len()
            );
        }

        self.build_schedule(&state, start_date, forced)
    }

    fn earliest_start(&self, state: &SchedulerState, idx: TaskIdx) -> i64 {
        self.graph
            .predecessors(idx)
            .iter()
            .map(|&p| state.end_or_zero(p))
            .max()
            .unwrap_or(0)
    }

    fn build_schedule(
        &self,
        state: &SchedulerState,
        start_date: NaiveDate,
        forced: Vec<TaskIdx>,
    ) -> Schedule {
        // Graph indices follow id order, so this is already sorted by id.
        let entries: Vec<ScheduleEntry> = self
            .graph
            .indices()
            .map(|idx| {
                let task = self.graph.task(idx);
                let (start, end) = state.offsets[idx as usize].unwrap_or((0, task.duration));
                ScheduleEntry {
                    id: task.id.clone(),
                    name: task.name.clone(),
                    start_offset: start,
                    end_offset: end,
                    duration: task.duration,
                    start_date: date_at(start_date, start),
                    end_date: date_at(start_date, end),
                    status: task.status.clone(),
                    dependencies: task.predecessors.clone(),
                    resources: task.resources.clone(),
                    description: task.description.clone(),
                }
            })
            .collect();

        let project_end_offset = entries.iter().map(|e| e.end_offset).max().unwrap_or(0);
        let forced: Vec<TaskId> = forced
            .into_iter()
            .map(|idx| self.graph.task(idx).id.clone())
            .collect();

        Schedule {
            start_date,
            entries,
            project_end_offset,
            forced,
        }
    }
}

/// Schedule `graph` from `start_date` with logging disabled.
pub fn schedule(graph: &TaskGraph, start_date: NaiveDate) -> Schedule {
    ForwardScheduler::new(graph).schedule(start_date)
}

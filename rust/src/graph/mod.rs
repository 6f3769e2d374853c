//! Validated task dependency graph.
//!
//! Tasks are stored densely in id order. Predecessor and successor lists hold
//! dense indices and only ever reference tasks present in the graph; dangling
//! references are dropped while the graph is assembled.

mod builder;
mod diagnostics;

pub use builder::{MalformedInput, Project, RawProject, RawTask};
pub use diagnostics::Diagnostic;

use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

use crate::index::{TaskIdx, TaskIndex};
use crate::models::{Task, TaskId};

/// Immutable task graph shared by every analysis pass.
#[derive(Clone, Debug, Default)]
pub struct TaskGraph {
    index: TaskIndex,
    tasks: Vec<Task>,
    preds: Vec<Vec<TaskIdx>>,
    succs: Vec<Vec<TaskIdx>>,
    diagnostics: Vec<Diagnostic>,
}

impl TaskGraph {
    /// Build a graph from already-normalized tasks.
    ///
    /// Duplicate ids keep the last task. Unknown predecessor ids are dropped
    /// and reported as diagnostics.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self::assemble(tasks, Vec::new())
    }

    pub(crate) fn assemble(tasks: Vec<Task>, mut diagnostics: Vec<Diagnostic>) -> Self {
        let mut by_id: BTreeMap<TaskId, Task> = BTreeMap::new();
        let mut duplicates: FxHashSet<TaskId> = FxHashSet::default();
        for task in tasks {
            if let Some(previous) = by_id.insert(task.id.clone(), task) {
                if duplicates.insert(previous.id.clone()) {
                    diagnostics.push(Diagnostic::DuplicateId { task: previous.id });
                }
            }
        }

        let index = TaskIndex::from_sorted(by_id.keys().cloned());
        let n = index.len();
        let mut tasks: Vec<Task> = by_id.into_values().collect();
        let mut preds: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        let mut succs: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];

        for (idx, task) in tasks.iter_mut().enumerate() {
            let mut seen: FxHashSet<TaskIdx> = FxHashSet::default();
            let mut kept: Vec<TaskId> = Vec::with_capacity(task.predecessors.len());
            for pred_id in task.predecessors.drain(..) {
                match index.get(&pred_id) {
                    Some(pred) => {
                        if seen.insert(pred) {
                            preds[idx].push(pred);
                            succs[pred as usize].push(idx as TaskIdx);
                            kept.push(pred_id);
                        }
                    }
                    None => diagnostics.push(Diagnostic::DanglingReference {
                        task: task.id.clone(),
                        missing: pred_id,
                    }),
                }
            }
            task.predecessors = kept;

            let mut names: FxHashSet<String> = FxHashSet::default();
            task.resources
                .retain(|r| !r.trim().is_empty() && names.insert(r.clone()));
        }

        // Successor lists are filled in ascending task order already.
        Self {
            index,
            tasks,
            preds,
            succs,
            diagnostics,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in id order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[inline]
    pub fn task(&self, idx: TaskIdx) -> &Task {
        &self.tasks[idx as usize]
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.index.get(id).map(|idx| self.task(idx))
    }

    #[inline]
    pub fn index_of(&self, id: &TaskId) -> Option<TaskIdx> {
        self.index.get(id)
    }

    /// Resolved predecessors of a task, in input order.
    #[inline]
    pub fn predecessors(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.preds[idx as usize]
    }

    /// Tasks that list `idx` as a predecessor, in id order.
    #[inline]
    pub fn successors(&self, idx: TaskIdx) -> &[TaskIdx] {
        &self.succs[idx as usize]
    }

    /// Successor ids of the task with the given id.
    pub fn successors_of(&self, id: &TaskId) -> Vec<&TaskId> {
        self.index_of(id)
            .map(|idx| {
                self.successors(idx)
                    .iter()
                    .map(|&s| &self.task(s).id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Effective duration of a task.
    #[inline]
    pub fn duration(&self, idx: TaskIdx) -> i64 {
        self.tasks[idx as usize].duration
    }

    /// Fallbacks applied while building the graph.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn indices(&self) -> impl Iterator<Item = TaskIdx> {
        0..self.tasks.len() as TaskIdx
    }
}

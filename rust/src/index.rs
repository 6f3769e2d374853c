//! Dense integer indexing of task ids.
//!
//! The graph stores tasks in id order, so the dense index of a task is also
//! its rank in "task id ascending" order. Comparing indices is therefore the
//! same as comparing ids.

use rustc_hash::FxHashMap;

use crate::models::TaskId;

/// Dense task index (u32 for compact adjacency lists).
pub type TaskIdx = u32;

/// Mapping from task ids to dense indices.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    to_idx: FxHashMap<TaskId, TaskIdx>,
}

impl TaskIndex {
    /// Build an index from ids that are already sorted and unique.
    pub fn from_sorted<I: IntoIterator<Item = TaskId>>(ids: I) -> Self {
        let to_idx = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i as TaskIdx))
            .collect();
        Self { to_idx }
    }

    #[inline]
    pub fn get(&self, id: &TaskId) -> Option<TaskIdx> {
        self.to_idx.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.to_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_idx.is_empty()
    }
}

//! Dense integer indices for task ids.
//!
//! Graph adjacency is stored per index so traversals work on `Vec<bool>`
//! markers instead of hashing strings at every step.

use rustc_hash::FxHashMap;

use crate::models::Task;

/// Interned task index (u32 for compact storage and fast hashing).
pub type TaskIdx = u32;

/// Bidirectional mapping between task id strings and dense indices.
///
/// Indices follow first appearance in the snapshot, so iterating `0..len()`
/// visits tasks in input order.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    to_idx: FxHashMap<String, TaskIdx>,
    ids: Vec<String>,
}

impl TaskIndex {
    /// Index every task of a snapshot. Duplicate ids keep their first index.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut index = Self {
            to_idx: FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default()),
            ids: Vec::with_capacity(tasks.len()),
        };
        for task in tasks {
            index.insert(&task.id);
        }
        index
    }

    fn insert(&mut self, id: &str) -> TaskIdx {
        if let Some(&idx) = self.to_idx.get(id) {
            return idx;
        }
        let idx = self.ids.len() as TaskIdx;
        self.ids.push(id.to_string());
        self.to_idx.insert(id.to_string(), idx);
        idx
    }

    /// Index of a known task id.
    #[inline]
    pub fn get(&self, id: &str) -> Option<TaskIdx> {
        self.to_idx.get(id).copied()
    }

    /// Task id for an index. Panics on an index this snapshot never issued.
    #[inline]
    pub fn id(&self, idx: TaskIdx) -> &str {
        &self.ids[idx as usize]
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str) -> Task {
        Task::new(id.to_string(), id.to_uppercase(), None, 1.0, 5, vec![])
    }

    #[test]
    fn test_indices_follow_input_order() {
        let index = TaskIndex::from_tasks(&[make_task("b"), make_task("a"), make_task("c")]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.get("b"), Some(0));
        assert_eq!(index.get("a"), Some(1));
        assert_eq!(index.id(2), "c");
        assert_eq!(index.get("missing"), None);
    }

    #[test]
    fn test_duplicate_ids_share_first_index() {
        let index = TaskIndex::from_tasks(&[make_task("a"), make_task("b"), make_task("a")]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a"), Some(0));
    }

    #[test]
    fn test_empty_snapshot() {
        let index = TaskIndex::from_tasks(&[]);
        assert!(index.is_empty());
    }
}

//! Sticky per-task completion flags

use serde::{Deserialize, Serialize};

use crate::tasks::oracle::TaskId;

/// One flag per predicate. A match sets a flag; nothing in normal play
/// clears it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFlags([bool; TaskId::COUNT]);

impl TaskFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, task: TaskId) {
        self.0[task.index()] = true;
    }

    pub fn is_set(&self, task: TaskId) -> bool {
        self.0[task.index()]
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|&f| f)
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }

    pub fn clear(&mut self) {
        self.0 = [false; TaskId::COUNT];
    }

    /// Flags set on both `self` and `other`
    pub fn shares_any(&self, other: &TaskFlags) -> bool {
        TaskId::ALL
            .iter()
            .any(|&task| self.is_set(task) && other.is_set(task))
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        TaskId::ALL.into_iter().filter(move |&task| self.is_set(task))
    }

    /// First set flag in canonical order
    pub fn first(&self) -> Option<TaskId> {
        self.iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_idempotent() {
        let mut flags = TaskFlags::new();
        flags.set(TaskId::Xor);
        flags.set(TaskId::Xor);
        assert!(flags.is_set(TaskId::Xor));
        assert_eq!(flags.count(), 1);
    }

    #[test]
    fn test_shares_any() {
        let mut host = TaskFlags::new();
        let mut parasite = TaskFlags::new();
        host.set(TaskId::Not);
        parasite.set(TaskId::Equ);
        assert!(!host.shares_any(&parasite));

        host.set(TaskId::Equ);
        assert!(host.shares_any(&parasite));
    }

    #[test]
    fn test_first_follows_canonical_order() {
        let mut flags = TaskFlags::new();
        assert_eq!(flags.first(), None);
        flags.set(TaskId::Equ);
        flags.set(TaskId::Nand);
        assert_eq!(flags.first(), Some(TaskId::Nand));
        flags.clear();
        assert!(!flags.any());
    }
}

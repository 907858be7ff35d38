//! Deferred reproduction requests
//!
//! Organisms never spawn directly while the population is being iterated.
//! They queue their slot here and the scheduler drains the queues in later
//! phases, revalidating each entry.

use serde::{Deserialize, Serialize};

use crate::core::types::SlotIndex;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBuffer {
    host_births: Vec<SlotIndex>,
    parasite_births: Vec<SlotIndex>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the host at `slot` for reproduction. A slot is queued at most
    /// once per tick.
    pub fn queue_host(&mut self, slot: SlotIndex) {
        if !self.host_births.contains(&slot) {
            self.host_births.push(slot);
        }
    }

    /// Queue the parasite at `slot`. The drain loop reproduces it as long as
    /// its points allow, so one entry per slot is enough.
    pub fn queue_parasite(&mut self, slot: SlotIndex) {
        if !self.parasite_births.contains(&slot) {
            self.parasite_births.push(slot);
        }
    }

    pub fn host_births(&self) -> &[SlotIndex] {
        &self.host_births
    }

    pub fn parasite_births(&self) -> &[SlotIndex] {
        &self.parasite_births
    }

    pub fn take_host_births(&mut self) -> Vec<SlotIndex> {
        std::mem::take(&mut self.host_births)
    }

    pub fn take_parasite_births(&mut self) -> Vec<SlotIndex> {
        std::mem::take(&mut self.parasite_births)
    }

    pub fn is_empty(&self) -> bool {
        self.host_births.is_empty() && self.parasite_births.is_empty()
    }

    pub fn clear(&mut self) {
        self.host_births.clear();
        self.parasite_births.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queues_dedupe_and_keep_order() {
        let mut commands = CommandBuffer::new();
        commands.queue_host(SlotIndex(3));
        commands.queue_host(SlotIndex(1));
        commands.queue_host(SlotIndex(3));
        commands.queue_parasite(SlotIndex(3));

        assert_eq!(commands.host_births(), &[SlotIndex(3), SlotIndex(1)]);
        assert_eq!(commands.parasite_births(), &[SlotIndex(3)]);

        let drained = commands.take_host_births();
        assert_eq!(drained.len(), 2);
        assert!(commands.host_births().is_empty());

        commands.clear();
        assert!(commands.is_empty());
    }
}

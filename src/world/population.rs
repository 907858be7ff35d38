//! Fixed-size slot array of hosts

use serde::{Deserialize, Serialize};

use crate::core::types::{GridShape, SlotIndex};
use crate::organism::{Host, Lifecycle};

/// One optional host per grid slot. Parasites live inside their host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    grid: GridShape,
    slots: Vec<Option<Host>>,
}

impl Population {
    pub fn new(grid: GridShape) -> Self {
        Self {
            grid,
            slots: (0..grid.len()).map(|_| None).collect(),
        }
    }

    pub fn grid(&self) -> GridShape {
        self.grid
    }

    /// Number of slots, occupied or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: SlotIndex) -> Option<&Host> {
        self.slots.get(slot.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut Host> {
        self.slots.get_mut(slot.index()).and_then(Option::as_mut)
    }

    pub fn is_occupied(&self, slot: SlotIndex) -> bool {
        self.get(slot).is_some()
    }

    /// Put `host` into `slot`, returning whoever was there. Out-of-range
    /// slots hand the host straight back.
    pub fn place(&mut self, slot: SlotIndex, mut host: Host) -> Option<Host> {
        let Some(cell) = self.slots.get_mut(slot.index()) else {
            return Some(host);
        };
        host.body_mut().state.location = Some(slot);
        if let Some(parasite) = host.parasite_mut() {
            parasite.body_mut().state.location = Some(slot);
        }
        cell.replace(host)
    }

    /// Take the host out of `slot`; its parasite goes with it
    pub fn remove(&mut self, slot: SlotIndex) -> Option<Host> {
        self.slots.get_mut(slot.index()).and_then(Option::take)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &Host)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|host| (SlotIndex(i), host)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotIndex, &mut Host)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_mut().map(|host| (SlotIndex(i), host)))
    }

    pub fn empty_slots(&self) -> Vec<SlotIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| SlotIndex(i))
            .collect()
    }

    pub fn host_count(&self) -> usize {
        self.slots.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn parasite_count(&self) -> usize {
        self.iter().filter(|(_, host)| host.has_parasite()).count()
    }
}

//! Small value types shared across the engine: ticks, slots, roles and the grid

use serde::{Deserialize, Serialize};

/// Simulation tick counter (one full `World::update`)
pub type Tick = u64;

/// Index of a slot in the population array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which role an organism plays in the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Host,
    Parasite,
}

impl Role {
    pub fn is_parasite(self) -> bool {
        matches!(self, Role::Parasite)
    }
}

/// Rectangular grid the population slots are laid out on (row-major)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub width: usize,
    pub height: usize,
}

impl GridShape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn coords(&self, slot: SlotIndex) -> (usize, usize) {
        (slot.0 % self.width, slot.0 / self.width)
    }

    pub fn slot_at(&self, x: usize, y: usize) -> SlotIndex {
        SlotIndex(y * self.width + x)
    }

    /// Moore neighbourhood on a torus, excluding the slot itself.
    ///
    /// Degenerate grids (a single row or column) can yield duplicates; callers
    /// only sample from the list so that is harmless.
    pub fn neighbors(&self, slot: SlotIndex) -> Vec<SlotIndex> {
        if self.len() <= 1 {
            return Vec::new();
        }
        let (x, y) = self.coords(slot);
        let mut out = Vec::with_capacity(8);
        for dy in [self.height - 1, 0, 1] {
            for dx in [self.width - 1, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x + dx) % self.width;
                let ny = (y + dy) % self.height;
                let neighbor = self.slot_at(nx, ny);
                if neighbor != slot {
                    out.push(neighbor);
                }
            }
        }
        out
    }
}

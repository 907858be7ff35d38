//! Per-organism mutable record driven by the VM and the scheduler

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{Role, SlotIndex};
use crate::tasks::{TaskFlags, TaskId};

/// Number of recent inputs the task oracle looks at
pub const INPUT_BUFFER_LEN: usize = 4;

/// Mutable state owned by exactly one organism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismState {
    /// Fitness currency; may go negative
    pub points: f64,
    /// Ticks processed since birth or last reproduction
    pub age: u32,
    /// Ring buffer of the most recent inputs handed out by IO
    pub recent_inputs: [u32; INPUT_BUFFER_LEN],
    /// Next write position in `recent_inputs`
    pub write_index: usize,
    /// Sticky task completion flags
    pub task_flags: TaskFlags,
    pub role: Role,
    /// Tasks solved during the current tick (parasites only)
    pub last_solved_tasks: Vec<TaskId>,
    /// Ticks since a parasite last solved anything
    pub updates_since_task: u32,
    /// Slot the organism (or its host) occupies, once placed
    pub location: Option<SlotIndex>,
}

impl OrganismState {
    pub fn new(role: Role) -> Self {
        Self {
            points: 0.0,
            age: 0,
            recent_inputs: [0; INPUT_BUFFER_LEN],
            write_index: 0,
            task_flags: TaskFlags::new(),
            role,
            last_solved_tasks: Vec::new(),
            updates_since_task: 0,
            location: None,
        }
    }

    pub fn is_parasite(&self) -> bool {
        self.role.is_parasite()
    }

    pub fn add_points(&mut self, delta: f64) {
        self.points += delta;
    }

    /// Store a new input, overwriting the oldest one
    pub fn push_input(&mut self, input: u32) {
        self.recent_inputs[self.write_index] = input;
        self.write_index = (self.write_index + 1) % INPUT_BUFFER_LEN;
    }

    /// Fill the input buffer with fresh random values
    pub fn seed_inputs<R: Rng>(&mut self, rng: &mut R) {
        for slot in self.recent_inputs.iter_mut() {
            *slot = rng.gen();
        }
        self.write_index = 0;
    }

    pub fn has_completed_any_task(&self) -> bool {
        self.task_flags.any()
    }

    /// First solved task in canonical order, used for display colouring
    pub fn dominant_task(&self) -> Option<TaskId> {
        self.task_flags.first()
    }

    /// Zero the transient state of a newborn. Role and location are kept;
    /// sticky flags are only cleared when asked.
    pub fn reset(&mut self, clear_flags: bool) {
        self.points = 0.0;
        self.age = 0;
        self.last_solved_tasks.clear();
        self.updates_since_task = 0;
        if clear_flags {
            self.task_flags.clear();
        }
    }
}

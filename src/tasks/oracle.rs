//! Task oracle - nine binary logic predicates over the last four inputs
//!
//! Each predicate asks whether `output` equals a bitwise combination of the
//! recent inputs: one input for NOT, an ordered pair `i != j` for the rest.

use serde::{Deserialize, Serialize};

/// The nine logic tasks, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskId {
    Not,
    Nand,
    And,
    Orn,
    Or,
    Andn,
    Nor,
    Xor,
    Equ,
}

impl TaskId {
    pub const COUNT: usize = 9;

    pub const ALL: [TaskId; TaskId::COUNT] = [
        TaskId::Not,
        TaskId::Nand,
        TaskId::And,
        TaskId::Orn,
        TaskId::Or,
        TaskId::Andn,
        TaskId::Nor,
        TaskId::Xor,
        TaskId::Equ,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TaskId::Not => "NOT",
            TaskId::Nand => "NAND",
            TaskId::And => "AND",
            TaskId::Orn => "ORN",
            TaskId::Or => "OR",
            TaskId::Andn => "ANDN",
            TaskId::Nor => "NOR",
            TaskId::Xor => "XOR",
            TaskId::Equ => "EQU",
        }
    }

    /// Position in `ALL`, used to index per-task arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// Apply the predicate's binary operator to an ordered input pair
    pub fn combine(self, a: u32, b: u32) -> u32 {
        match self {
            TaskId::Not => !a,
            TaskId::Nand => !(a & b),
            TaskId::And => a & b,
            TaskId::Orn => a | !b,
            TaskId::Or => a | b,
            TaskId::Andn => a & !b,
            TaskId::Nor => !(a | b),
            TaskId::Xor => a ^ b,
            TaskId::Equ => !(a ^ b),
        }
    }

    /// Does `output` satisfy this predicate for some input (pair)?
    pub fn check(self, output: u32, inputs: &[u32; 4]) -> bool {
        if self == TaskId::Not {
            return inputs.iter().any(|&a| !a == output);
        }

        for i in 0..inputs.len() {
            for j in 0..inputs.len() {
                if i != j && self.combine(inputs[i], inputs[j]) == output {
                    return true;
                }
            }
        }
        false
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// First predicate (in canonical order) that `output` satisfies
pub fn evaluate(output: u32, inputs: &[u32; 4]) -> Option<TaskId> {
    TaskId::ALL.into_iter().find(|task| task.check(output, inputs))
}

/// Every predicate `output` satisfies, in canonical order
pub fn matching_tasks(output: u32, inputs: &[u32; 4]) -> impl Iterator<Item = TaskId> + '_ {
    TaskId::ALL
        .into_iter()
        .filter(move |task| task.check(output, inputs))
}

//! Genome virtual machine
//!
//! A small register machine: eight `u32` registers, tag-matched global
//! anchors for control flow, and two engine-facing instructions (IO and
//! Reproduce) surfaced through the [`Peripheral`] trait.

pub mod cpu;
pub mod instruction;
pub mod program;

pub use cpu::{Cpu, JumpTable, Peripheral};
pub use instruction::{Instruction, OpCode, NUM_REGISTERS};
pub use program::Program;

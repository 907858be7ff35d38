//! Register machine that executes a genome program
//!
//! The CPU knows nothing about points, tasks or the population. The two
//! instructions with side effects outside the core (IO and Reproduce) are
//! routed through a [`Peripheral`] supplied by the caller for each batch.

use serde::{Deserialize, Serialize};

use crate::vm::instruction::{Instruction, OpCode, NUM_REGISTERS};
use crate::vm::program::Program;

/// Engine-side handlers for the side-effecting instructions
pub trait Peripheral {
    /// Called by IO with the register value being emitted. Returns the fresh
    /// input that replaces it.
    fn on_output(&mut self, output: u32) -> u32;

    /// Called by Reproduce. A signal only; the engine decides what happens.
    fn on_reproduce(&mut self);
}

/// Global anchor table: (tag, program position) in program order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpTable {
    anchors: Vec<(u8, usize)>,
}

impl JumpTable {
    pub fn build(program: &Program) -> Self {
        let anchors = program
            .iter()
            .enumerate()
            .filter(|(_, inst)| inst.op == OpCode::Anchor)
            .map(|(pos, inst)| (inst.tag, pos))
            .collect();
        Self { anchors }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Index (in program order) of the anchor whose tag is closest to `tag`
    /// by Hamming distance; ties go to the earliest anchor.
    pub fn anchor_index_for(&self, tag: u8) -> Option<usize> {
        self.anchors
            .iter()
            .enumerate()
            .min_by_key(|(i, (anchor_tag, _))| ((anchor_tag ^ tag).count_ones(), *i))
            .map(|(i, _)| i)
    }

    /// Program position a jump with `tag` lands on
    pub fn target(&self, tag: u8) -> Option<usize> {
        self.anchor_index_for(tag).map(|i| self.anchors[i].1)
    }
}

/// Registers, instruction pointer and jump table of one organism
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cpu {
    pub registers: [u32; NUM_REGISTERS],
    pub ip: usize,
    jump_table: JumpTable,
}

impl Cpu {
    pub fn new(program: &Program) -> Self {
        let mut cpu = Self::default();
        cpu.initialize_anchors(program);
        cpu
    }

    /// Clear registers and rewind. The jump table is kept.
    pub fn reset(&mut self) {
        self.registers = [0; NUM_REGISTERS];
        self.ip = 0;
    }

    /// Rebuild the jump table. Required whenever the program changes.
    pub fn initialize_anchors(&mut self, program: &Program) {
        self.jump_table = JumpTable::build(program);
        if self.ip >= program.len() {
            self.ip = 0;
        }
    }

    pub fn jump_table(&self) -> &JumpTable {
        &self.jump_table
    }

    /// Execute `n` instructions, wrapping around the end of the program
    pub fn run_cycles<P: Peripheral>(&mut self, n: usize, program: &Program, peripheral: &mut P) {
        if program.is_empty() {
            return;
        }

        for _ in 0..n {
            if self.ip >= program.len() {
                self.ip = 0;
            }
            let Some(inst) = program.get(self.ip).copied() else {
                return;
            };
            let next = self.execute(&inst, program.len(), peripheral);
            self.ip = next % program.len();
        }
    }

    /// Execute one instruction, returning the next instruction pointer
    fn execute<P: Peripheral>(&mut self, inst: &Instruction, len: usize, peripheral: &mut P) -> usize {
        let r = &mut self.registers;
        match inst.op {
            OpCode::Nop | OpCode::Anchor => {}
            OpCode::ShiftLeft => {
                r[inst.reg(0)] = r[inst.reg(1)].wrapping_shl(r[inst.reg(2)] % 32);
            }
            OpCode::ShiftRight => {
                r[inst.reg(0)] = r[inst.reg(1)].wrapping_shr(r[inst.reg(2)] % 32);
            }
            OpCode::Increment => {
                r[inst.reg(0)] = r[inst.reg(0)].wrapping_add(1);
            }
            OpCode::Decrement => {
                r[inst.reg(0)] = r[inst.reg(0)].wrapping_sub(1);
            }
            OpCode::Add => {
                r[inst.reg(0)] = r[inst.reg(1)].wrapping_add(r[inst.reg(2)]);
            }
            OpCode::Subtract => {
                r[inst.reg(0)] = r[inst.reg(1)].wrapping_sub(r[inst.reg(2)]);
            }
            OpCode::Nand => {
                r[inst.reg(0)] = !(r[inst.reg(1)] & r[inst.reg(2)]);
            }
            OpCode::Andn => {
                r[inst.reg(0)] = r[inst.reg(1)] & !r[inst.reg(2)];
            }
            OpCode::Io => {
                let reg = inst.reg(0);
                r[reg] = peripheral.on_output(r[reg]);
            }
            OpCode::Reproduce => peripheral.on_reproduce(),
            OpCode::JumpIfNot => {
                if r[inst.reg(0)] == 0 {
                    // A stale table may point past the end; treat that as no anchor
                    if let Some(target) = self.jump_table.target(inst.tag).filter(|&t| t < len) {
                        return target;
                    }
                }
            }
        }
        self.ip + 1
    }
}

//! Instruction set of the genome VM

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Registers per core
pub const NUM_REGISTERS: usize = 8;

/// Operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpCode {
    Nop,
    ShiftLeft,
    ShiftRight,
    Increment,
    Decrement,
    Add,
    Subtract,
    /// Jump to the best-matching anchor if `r[a]` is zero
    JumpIfNot,
    /// Jump target, identified by its tag
    Anchor,
    /// Emit `r[a]` as output, then load a fresh input into `r[a]`
    Io,
    Nand,
    Andn,
    /// Ask the engine for a reproduction slot
    Reproduce,
}

impl OpCode {
    pub const ALL: [OpCode; 13] = [
        OpCode::Nop,
        OpCode::ShiftLeft,
        OpCode::ShiftRight,
        OpCode::Increment,
        OpCode::Decrement,
        OpCode::Add,
        OpCode::Subtract,
        OpCode::JumpIfNot,
        OpCode::Anchor,
        OpCode::Io,
        OpCode::Nand,
        OpCode::Andn,
        OpCode::Reproduce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OpCode::Nop => "Nop",
            OpCode::ShiftLeft => "ShiftLeft",
            OpCode::ShiftRight => "ShiftRight",
            OpCode::Increment => "Increment",
            OpCode::Decrement => "Decrement",
            OpCode::Add => "Add",
            OpCode::Subtract => "Subtract",
            OpCode::JumpIfNot => "JumpIfNot",
            OpCode::Anchor => "Anchor",
            OpCode::Io => "IO",
            OpCode::Nand => "Nand",
            OpCode::Andn => "Andn",
            OpCode::Reproduce => "Reproduce",
        }
    }

    /// Number of register arguments the op reads or writes
    pub fn arity(self) -> usize {
        match self {
            OpCode::Nop | OpCode::Anchor | OpCode::Reproduce => 0,
            OpCode::Increment | OpCode::Decrement | OpCode::JumpIfNot | OpCode::Io => 1,
            OpCode::ShiftLeft
            | OpCode::ShiftRight
            | OpCode::Add
            | OpCode::Subtract
            | OpCode::Nand
            | OpCode::Andn => 3,
        }
    }

    /// Whether the op uses its tag (jumps and anchors)
    pub fn uses_tag(self) -> bool {
        matches!(self, OpCode::JumpIfNot | OpCode::Anchor)
    }

    /// Relative weight when sampling random instructions
    pub fn prevalence(self) -> u32 {
        match self {
            OpCode::Nand | OpCode::Andn => 5,
            OpCode::Io => 3,
            _ => 1,
        }
    }
}

/// A single genome instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub op: OpCode,
    pub args: [u8; 3],
    pub tag: u8,
}

impl Instruction {
    pub fn new(op: OpCode, args: [u8; 3]) -> Self {
        Self { op, args, tag: 0 }
    }

    pub fn tagged(op: OpCode, arg: u8, tag: u8) -> Self {
        Self {
            op,
            args: [arg, 0, 0],
            tag,
        }
    }

    pub fn nop() -> Self {
        Self::new(OpCode::Nop, [0; 3])
    }

    /// Sample an instruction weighted by prevalence with uniform arguments
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let op = sample_op(rng);
        let mut args = [0u8; 3];
        for arg in args.iter_mut() {
            *arg = rng.gen_range(0..NUM_REGISTERS as u8);
        }
        Self {
            op,
            args,
            tag: rng.gen(),
        }
    }

    /// Register index of argument `i`, wrapped into range
    pub fn reg(&self, i: usize) -> usize {
        self.args[i] as usize % NUM_REGISTERS
    }
}

fn sample_op<R: Rng>(rng: &mut R) -> OpCode {
    let total: u32 = OpCode::ALL.iter().map(|op| op.prevalence()).sum();
    let mut roll = rng.gen_range(0..total);
    for op in OpCode::ALL {
        if roll < op.prevalence() {
            return op;
        }
        roll -= op.prevalence();
    }
    OpCode::Nop
}

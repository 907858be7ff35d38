//! Genome programs: generation, point mutation and disassembly

use std::fmt::Write as _;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::vm::cpu::JumpTable;
use crate::vm::instruction::{Instruction, OpCode};

/// A genome tape of instructions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Random program with ops sampled by prevalence
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self {
            instructions: (0..len).map(|_| Instruction::random(rng)).collect(),
        }
    }

    /// Minimal self-sustaining program: reads two inputs, emits their NAND,
    /// asks to reproduce, loops.
    pub fn ancestor() -> Self {
        Self::new(vec![
            Instruction::tagged(OpCode::Anchor, 0, 0),
            Instruction::new(OpCode::Io, [0, 0, 0]),
            Instruction::new(OpCode::Io, [1, 0, 0]),
            Instruction::new(OpCode::Nand, [2, 0, 1]),
            Instruction::new(OpCode::Io, [2, 0, 0]),
            Instruction::new(OpCode::Reproduce, [0, 0, 0]),
            // r7 is never written, so this always jumps back to the anchor
            Instruction::tagged(OpCode::JumpIfNot, 7, 0),
        ])
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Replace each instruction with a freshly sampled one at probability
    /// `rate`. Returns how many positions were rewritten.
    ///
    /// Any jump table built for this program is stale afterwards.
    pub fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) -> usize {
        if rate <= 0.0 {
            return 0;
        }
        let rate = rate.min(1.0);
        let mut mutated = 0;
        for inst in self.instructions.iter_mut() {
            if rng.gen_bool(rate) {
                *inst = Instruction::random(rng);
                mutated += 1;
            }
        }
        mutated
    }

    /// Human-readable listing. Anchors are labelled `AA`, `AB`, ... in
    /// program order; jumps print the label they would land on.
    pub fn disassemble(&self) -> String {
        let table = JumpTable::build(self);
        let mut out = String::new();
        let mut anchors_seen = 0;

        for inst in &self.instructions {
            match inst.op {
                OpCode::Anchor => {
                    let _ = writeln!(out, "{}:", anchor_label(anchors_seen));
                    anchors_seen += 1;
                }
                OpCode::JumpIfNot => {
                    let label = table
                        .anchor_index_for(inst.tag)
                        .map(anchor_label)
                        .unwrap_or_else(|| "<nowhere>".to_string());
                    let _ = writeln!(out, "    {:<12}r{}, {}", "jump if not", inst.reg(0), label);
                }
                op => {
                    let regs: Vec<String> = (0..op.arity()).map(|i| format!("r{}", inst.reg(i))).collect();
                    let line = format!("    {:<12}{}", op.name().to_lowercase(), regs.join(", "));
                    let _ = writeln!(out, "{}", line.trim_end());
                }
            }
        }
        out
    }
}

/// Two-letter label for the n-th anchor: AA, AB, ..., AZ, BA, ...
fn anchor_label(index: usize) -> String {
    let hi = (b'A' + (index / 26 % 26) as u8) as char;
    let lo = (b'A' + (index % 26) as u8) as char;
    format!("{}{}", hi, lo)
}

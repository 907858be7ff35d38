//! Shared organism body and the lifecycle capability set
//!
//! `Organism` is the plain variant: a program, the CPU running it and the
//! mutable state. `Host` and `Parasite` wrap one and add their own rules
//! through the `Lifecycle` trait.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Role, SlotIndex};
use crate::organism::state::OrganismState;
use crate::vm::{Cpu, Program};
use crate::world::context::TickContext;
use crate::world::systems::reward::RewardIo;

/// Genome, CPU and state of a single organism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    program: Program,
    cpu: Cpu,
    pub state: OrganismState,
}

impl Organism {
    /// Build an organism around `program` with fresh state
    pub fn new<R: Rng>(program: Program, role: Role, rng: &mut R) -> Self {
        let mut organism = Self {
            cpu: Cpu::new(&program),
            program,
            state: OrganismState::new(role),
        };
        organism.initialize_state(rng);
        organism
    }

    /// Organism with a random program of `len` instructions
    pub fn random<R: Rng>(len: usize, role: Role, rng: &mut R) -> Self {
        let program = Program::random(len, rng);
        Self::new(program, role, rng)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn points(&self) -> f64 {
        self.state.points
    }

    pub fn add_points(&mut self, delta: f64) {
        self.state.add_points(delta);
    }

    pub fn age(&self) -> u32 {
        self.state.age
    }

    pub fn reset_age(&mut self) {
        self.state.age = 0;
    }

    /// Jump table and input buffer are derived from the program; both are
    /// rebuilt whenever the program changes.
    fn initialize_state<R: Rng>(&mut self, rng: &mut R) {
        self.cpu.initialize_anchors(&self.program);
        self.state.seed_inputs(rng);
    }

    /// Replace the genome and reinitialise the CPU around it
    pub fn load_program<R: Rng>(&mut self, program: Program, rng: &mut R) {
        self.program = program;
        self.cpu.reset();
        self.initialize_state(rng);
    }

    /// Return the CPU and transient state to a newborn's
    pub fn reset<R: Rng>(&mut self, clear_flags: bool, rng: &mut R) {
        self.cpu.reset();
        self.state.reset(clear_flags);
        self.initialize_state(rng);
    }

    /// Point-mutate the genome. Returns the number of rewritten instructions.
    pub fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) -> usize {
        let mutated = self.program.mutate(rate, rng);
        self.initialize_state(rng);
        mutated
    }

    /// Age by one tick and run one batch of VM cycles
    pub fn process(&mut self, slot: SlotIndex, ctx: &mut TickContext<'_>) {
        self.state.location = Some(slot);
        self.state.age += 1;

        let cycles = ctx.config.cycles_per_tick;
        let mut io = RewardIo::new(&mut self.state, ctx);
        self.cpu.run_cycles(cycles, &self.program, &mut io);
    }
}

/// Behaviour shared by every organism variant
pub trait Lifecycle {
    fn body(&self) -> &Organism;

    fn body_mut(&mut self) -> &mut Organism;

    fn is_dead(&self, config: &SimulationConfig) -> bool;

    /// Per-instruction mutation probability applied to offspring
    fn mutation_rate(&self, config: &SimulationConfig) -> f64;

    /// Whether offspring start with cleared sticky flags
    fn clears_flags_at_birth(&self, config: &SimulationConfig) -> bool;

    /// Deep copy of the genome and state, without anything attached
    fn clone_offspring(&self) -> Self
    where
        Self: Sized;

    fn process(&mut self, slot: SlotIndex, ctx: &mut TickContext<'_>) {
        self.body_mut().process(slot, ctx);
    }

    /// Clone, reset and mutate. Always yields an offspring; placing it is
    /// the caller's business.
    fn check_reproduction<R: Rng>(&self, config: &SimulationConfig, rng: &mut R) -> Self
    where
        Self: Sized,
    {
        let mut child = self.clone_offspring();
        let clear_flags = self.clears_flags_at_birth(config);
        let rate = self.mutation_rate(config);
        let body = child.body_mut();
        body.reset(clear_flags, rng);
        body.state.location = None;
        body.mutate(rate, rng);
        child
    }
}

impl Lifecycle for Organism {
    fn body(&self) -> &Organism {
        self
    }

    fn body_mut(&mut self) -> &mut Organism {
        self
    }

    fn is_dead(&self, config: &SimulationConfig) -> bool {
        self.state.age > config.life_span || self.state.points < 0.0
    }

    fn mutation_rate(&self, config: &SimulationConfig) -> f64 {
        config.mutation_rate
    }

    fn clears_flags_at_birth(&self, _config: &SimulationConfig) -> bool {
        true
    }

    fn clone_offspring(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_plain_death_rules() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = SimulationConfig {
            life_span: 10,
            ..Default::default()
        };
        let mut org = Organism::new(Program::ancestor(), Role::Host, &mut rng);
        assert!(!org.is_dead(&config));

        org.state.age = 11;
        assert!(org.is_dead(&config));

        org.state.age = 0;
        org.state.points = -0.01;
        assert!(org.is_dead(&config));
    }

    #[test]
    fn test_offspring_is_reset_and_unplaced() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = SimulationConfig {
            mutation_rate: 0.0,
            ..Default::default()
        };
        let mut parent = Organism::new(Program::ancestor(), Role::Host, &mut rng);
        parent.state.points = 50.0;
        parent.state.age = 12;
        parent.state.task_flags.set(TaskId::Nand);
        parent.state.location = Some(SlotIndex(4));

        let child = parent.check_reproduction(&config, &mut rng);
        assert_eq!(child.points(), 0.0);
        assert_eq!(child.age(), 0);
        assert!(!child.state.has_completed_any_task());
        assert_eq!(child.state.location, None);
        assert_eq!(child.program(), parent.program());
        // Parent untouched
        assert_eq!(parent.points(), 50.0);
    }

    #[test]
    fn test_mutation_rebuilds_jump_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut org = Organism::new(Program::ancestor(), Role::Host, &mut rng);
        assert_eq!(org.cpu().jump_table().len(), 1);

        org.load_program(Program::random(0, &mut rng), &mut rng);
        assert!(org.cpu().jump_table().is_empty());
        assert_eq!(org.cpu().ip, 0);
    }
}

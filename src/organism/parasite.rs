//! Parasite organisms
//!
//! A parasite lives inside a host's slot, runs its own program and earns
//! points by solving the same predicates its host has solved.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{ParasiteFlagPolicy, SimulationConfig};
use crate::core::types::Role;
use crate::organism::lifecycle::{Lifecycle, Organism};
use crate::tasks::TaskId;
use crate::vm::Program;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parasite {
    body: Organism,
    /// Fraction of the host's reward a matching parasite drains per tick
    pub virulence: f64,
    /// Nominal target predicate. Informational only.
    pub solved_task: TaskId,
}

impl Parasite {
    pub fn new(body: Organism, virulence: f64) -> Self {
        Self {
            body,
            virulence,
            solved_task: TaskId::Equ,
        }
    }

    /// Fresh parasite for injection: random genome, configured virulence
    /// and starting points
    pub fn spawn<R: Rng>(config: &SimulationConfig, rng: &mut R) -> Self {
        let body = Organism::random(config.genome_length, Role::Parasite, rng);
        Self::from_body(body, config)
    }

    /// Parasite running a given program, configured like an injected one
    pub fn with_program<R: Rng>(program: Program, config: &SimulationConfig, rng: &mut R) -> Self {
        let body = Organism::new(program, Role::Parasite, rng);
        Self::from_body(body, config)
    }

    fn from_body(mut body: Organism, config: &SimulationConfig) -> Self {
        body.state.points = config.parasite_start_points;
        Self::new(body, config.virulence)
    }

    pub fn points(&self) -> f64 {
        self.body.points()
    }

    pub fn add_points(&mut self, delta: f64) {
        self.body.add_points(delta);
    }
}

impl Lifecycle for Parasite {
    fn body(&self) -> &Organism {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Organism {
        &mut self.body
    }

    /// Dies from debt or from going too long without solving anything
    fn is_dead(&self, config: &SimulationConfig) -> bool {
        self.body.state.points <= config.parasite_death_points
            || self.body.state.updates_since_task > config.parasite_starvation_ticks
    }

    fn mutation_rate(&self, config: &SimulationConfig) -> f64 {
        config.parasite_mutation_rate
    }

    fn clears_flags_at_birth(&self, config: &SimulationConfig) -> bool {
        config.parasite_flags_on_birth == ParasiteFlagPolicy::Clear
    }

    fn clone_offspring(&self) -> Self {
        self.clone()
    }
}

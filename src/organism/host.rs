//! Host organisms
//!
//! A host occupies a grid slot and may carry at most one parasite. The
//! parasite is owned by value: removing it drops it, and removing the host
//! drops both.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::Role;
use crate::organism::lifecycle::{Lifecycle, Organism};
use crate::organism::parasite::Parasite;
use crate::vm::Program;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    body: Organism,
    parasite: Option<Parasite>,
}

impl Host {
    pub fn new(body: Organism) -> Self {
        Self {
            body,
            parasite: None,
        }
    }

    pub fn spawn<R: Rng>(config: &SimulationConfig, rng: &mut R) -> Self {
        let body = if config.seed_with_ancestor {
            Organism::new(Program::ancestor(), Role::Host, rng)
        } else {
            Organism::random(config.genome_length, Role::Host, rng)
        };
        Self::new(body)
    }

    pub fn with_program<R: Rng>(program: Program, rng: &mut R) -> Self {
        Self::new(Organism::new(program, Role::Host, rng))
    }

    pub fn points(&self) -> f64 {
        self.body.points()
    }

    pub fn add_points(&mut self, delta: f64) {
        self.body.add_points(delta);
    }

    pub fn has_parasite(&self) -> bool {
        self.parasite.is_some()
    }

    pub fn parasite(&self) -> Option<&Parasite> {
        self.parasite.as_ref()
    }

    pub fn parasite_mut(&mut self) -> Option<&mut Parasite> {
        self.parasite.as_mut()
    }

    /// Attach a parasite, dropping any previous one
    pub fn set_parasite(&mut self, mut parasite: Parasite) {
        parasite.body_mut().state.location = self.body.state.location;
        self.parasite = Some(parasite);
    }

    /// Detach and drop the parasite
    pub fn remove_parasite(&mut self) {
        self.parasite = None;
    }

    /// Detach the parasite and hand it to the caller
    pub fn take_parasite(&mut self) -> Option<Parasite> {
        self.parasite.take()
    }
}

impl Lifecycle for Host {
    fn body(&self) -> &Organism {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Organism {
        &mut self.body
    }

    /// Dies of old age or debt
    fn is_dead(&self, config: &SimulationConfig) -> bool {
        self.body.is_dead(config)
    }

    fn mutation_rate(&self, config: &SimulationConfig) -> f64 {
        config.mutation_rate
    }

    fn clears_flags_at_birth(&self, _config: &SimulationConfig) -> bool {
        true
    }

    /// Offspring never inherit the parent's parasite
    fn clone_offspring(&self) -> Self {
        Self::new(self.body.clone())
    }
}

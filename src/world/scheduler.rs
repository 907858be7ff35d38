//! World - the simulation context and its per-tick update
//!
//! One `World` owns everything a run needs: configuration, the population,
//! the reproduction queues, the tick counter and the random source. Every
//! phase borrows it explicitly; there is no global state.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{SlotIndex, Tick};
use crate::organism::{Host, Parasite};
use crate::report::TickStats;
use crate::vm::Program;
use crate::world::commands::CommandBuffer;
use crate::world::population::Population;
use crate::world::systems;

/// What happened during one `World::update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub tick: Tick,
    pub parasites_injected: usize,
    pub parasite_deaths: usize,
    pub host_deaths: usize,
    pub interactions: usize,
    pub host_births: usize,
    pub infections: usize,
    pub discarded_parasites: usize,
}

/// Counters accumulated over the whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub parasites_injected: usize,
    pub parasite_deaths: usize,
    pub host_deaths: usize,
    pub host_births: usize,
    pub infections: usize,
    pub discarded_parasites: usize,
}

impl RunTotals {
    pub fn absorb(&mut self, outcome: &TickOutcome) {
        self.parasites_injected += outcome.parasites_injected;
        self.parasite_deaths += outcome.parasite_deaths;
        self.host_deaths += outcome.host_deaths;
        self.host_births += outcome.host_births;
        self.infections += outcome.infections;
        self.discarded_parasites += outcome.discarded_parasites;
    }
}

/// The simulation context
pub struct World {
    pub config: SimulationConfig,
    pub population: Population,
    /// Reproduction requests gathered during the current tick
    pub commands: CommandBuffer,
    /// Random number generator (deterministic)
    pub rng: ChaCha8Rng,
    /// Last completed tick; the first `update` runs tick 1
    pub tick: Tick,
    /// Tick the first parasites arrived. Bonus and protection windows
    /// count from here and stay closed while this is `None`.
    pub injected_at: Option<Tick>,
    pub totals: RunTotals,
}

impl World {
    /// Empty world. Fails only if the configuration is invalid.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let population = Population::new(config.grid());

        Ok(Self {
            config,
            population,
            commands: CommandBuffer::new(),
            rng,
            tick: 0,
            injected_at: None,
            totals: RunTotals::default(),
        })
    }

    /// World with the starting hosts already placed
    pub fn seeded(config: SimulationConfig) -> Result<Self> {
        let mut world = Self::new(config)?;
        world.seed_population();
        Ok(world)
    }

    /// Place `num_start` random hosts on empty slots
    pub fn seed_population(&mut self) -> usize {
        systems::seed_population(self)
    }

    /// Put `host` at `slot`, returning the previous occupant
    pub fn inject_host(&mut self, host: Host, slot: SlotIndex) -> Option<Host> {
        self.population.place(slot, host)
    }

    /// Attach `parasite` to the host at `slot`. Fails (returning the
    /// parasite) if the slot is empty. The first parasite to arrive starts
    /// the bonus window.
    pub fn infect(&mut self, slot: SlotIndex, parasite: Parasite) -> std::result::Result<(), Parasite> {
        match self.population.get_mut(slot) {
            Some(host) => {
                host.set_parasite(parasite);
                self.mark_injection();
                Ok(())
            }
            None => Err(parasite),
        }
    }

    /// Run the configured parasite injection now
    pub fn inject_parasites(&mut self) -> usize {
        let attached = systems::inject_parasites(self);
        self.totals.parasites_injected += attached;
        attached
    }

    /// Start the window clock at the current tick unless it is already running
    pub(crate) fn mark_injection(&mut self) {
        self.injected_at.get_or_insert(self.tick);
    }

    pub fn in_bonus_window(&self) -> bool {
        self.config.in_bonus_window(self.injected_at, self.tick)
    }

    pub fn in_protection_window(&self) -> bool {
        self.config.in_protection_window(self.injected_at, self.tick)
    }

    /// New host running `program`, drawing from the world's random source
    pub fn spawn_host(&mut self, program: Program) -> Host {
        Host::with_program(program, &mut self.rng)
    }

    /// New parasite running `program`, configured like an injected one
    pub fn spawn_parasite(&mut self, program: Program) -> Parasite {
        Parasite::with_program(program, &self.config, &mut self.rng)
    }

    pub fn host_count(&self) -> usize {
        self.population.host_count()
    }

    pub fn parasite_count(&self) -> usize {
        self.population.parasite_count()
    }

    pub fn stats(&self) -> TickStats {
        TickStats::collect(self)
    }

    /// Execution order for this tick: every slot index, shuffled
    fn schedule(&mut self) -> Vec<SlotIndex> {
        let mut order: Vec<SlotIndex> = (0..self.population.len()).map(SlotIndex).collect();
        order.shuffle(&mut self.rng);
        order
    }

    /// Advance the simulation by one tick
    pub fn update(&mut self) -> TickOutcome {
        self.tick += 1;
        let mut outcome = TickOutcome {
            tick: self.tick,
            ..Default::default()
        };

        if self.tick == self.config.inject_parasites_at {
            outcome.parasites_injected = systems::inject_parasites(self);
        }

        let schedule = self.schedule();

        // 1. Parasite bookkeeping and standing bonus
        systems::prescan_parasites(self);

        // 2. Run hosts and parasites; detach dead parasites
        outcome.parasite_deaths = systems::execute_organisms(self, &schedule);

        // 3. Remove dead hosts (and their parasites)
        outcome.host_deaths = systems::remove_dead_hosts(self, &schedule);

        // 4. Parasites feed on matching hosts
        outcome.interactions = systems::resolve_interactions(self);

        // 5. Host births
        outcome.host_births = systems::reproduce_hosts(self);

        // 6. Hosts open to infection
        let viable = systems::viable_hosts(self);

        // 7. Parasite births
        let spread = systems::reproduce_parasites(self, viable);
        outcome.infections = spread.infections;
        outcome.discarded_parasites = spread.discarded;

        // 8. Nothing carries over to the next tick
        self.commands.clear();

        self.totals.absorb(&outcome);
        debug!(
            tick = self.tick,
            hosts = self.host_count(),
            parasites = self.parasite_count(),
            births = outcome.host_births,
            deaths = outcome.host_deaths,
            infections = outcome.infections,
            "tick complete"
        );
        outcome
    }

    /// Run `ticks` updates
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.update();
        }
    }
}

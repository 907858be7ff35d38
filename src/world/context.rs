//! Per-tick borrow bundle handed to organisms while they run

use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::Tick;
use crate::world::commands::CommandBuffer;

/// The parts of the world an executing organism may touch: read-only
/// config, the shared random source and the reproduction queues.
pub struct TickContext<'a> {
    pub config: &'a SimulationConfig,
    pub rng: &'a mut ChaCha8Rng,
    pub commands: &'a mut CommandBuffer,
    pub tick: Tick,
    /// Tick the first parasites arrived, if any have
    pub injected_at: Option<Tick>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        config: &'a SimulationConfig,
        rng: &'a mut ChaCha8Rng,
        commands: &'a mut CommandBuffer,
        tick: Tick,
        injected_at: Option<Tick>,
    ) -> Self {
        Self {
            config,
            rng,
            commands,
            tick,
            injected_at,
        }
    }

    pub fn in_bonus_window(&self) -> bool {
        self.config.in_bonus_window(self.injected_at, self.tick)
    }

    pub fn in_protection_window(&self) -> bool {
        self.config.in_protection_window(self.injected_at, self.tick)
    }
}

//! Output checking and reward attribution
//!
//! `RewardIo` is the bridge between a running CPU and the engine: every IO
//! instruction is checked against the task oracle before a fresh input is
//! handed back, and Reproduce requests are turned into queued commands.

use rand::Rng;
use tracing::trace;

use crate::core::types::Role;
use crate::organism::OrganismState;
use crate::tasks::matching_tasks;
use crate::vm::Peripheral;
use crate::world::context::TickContext;

/// Peripheral for one organism's batch of cycles
pub struct RewardIo<'s, 'c, 'w> {
    state: &'s mut OrganismState,
    ctx: &'c mut TickContext<'w>,
}

impl<'s, 'c, 'w> RewardIo<'s, 'c, 'w> {
    pub fn new(state: &'s mut OrganismState, ctx: &'c mut TickContext<'w>) -> Self {
        Self { state, ctx }
    }
}

impl Peripheral for RewardIo<'_, '_, '_> {
    fn on_output(&mut self, output: u32) -> u32 {
        check_output(output, self.state, self.ctx);
        let input: u32 = self.ctx.rng.gen();
        self.state.push_input(input);
        input
    }

    fn on_reproduce(&mut self) {
        request_reproduction(self.state, self.ctx);
    }
}

/// Score `output` against the organism's recent inputs. Every matching
/// predicate pays out independently. Returns how many matched.
pub fn check_output(output: u32, state: &mut OrganismState, ctx: &mut TickContext<'_>) -> usize {
    let inputs = state.recent_inputs;
    let reward = ctx.config.reward;
    let mut solved = 0;

    for task in matching_tasks(output, &inputs) {
        solved += 1;
        state.task_flags.set(task);

        match state.role {
            Role::Host => state.add_points(reward),
            Role::Parasite => {
                state.last_solved_tasks.push(task);
                state.updates_since_task = 0;
                if ctx.in_bonus_window() {
                    state.add_points(2.0 * reward);
                    if let Some(slot) = state.location {
                        ctx.commands.queue_parasite(slot);
                    }
                }
            }
        }

        trace!(
            tick = ctx.tick,
            role = ?state.role,
            task = %task,
            points = state.points,
            "task solved"
        );
    }

    solved
}

/// Reproduce instruction: queue the organism if it can afford offspring
pub fn request_reproduction(state: &OrganismState, ctx: &mut TickContext<'_>) {
    let Some(slot) = state.location else {
        return;
    };
    match state.role {
        Role::Host if state.points >= ctx.config.host_reproduce_threshold => {
            ctx.commands.queue_host(slot);
        }
        Role::Parasite if state.points >= ctx.config.parasite_reproduce_threshold => {
            ctx.commands.queue_parasite(slot);
        }
        _ => {}
    }
}

//! Parasite pre-scan and the VM execution pass

use tracing::trace;

use crate::core::types::SlotIndex;
use crate::organism::Lifecycle;
use crate::world::context::TickContext;
use crate::world::scheduler::World;

/// Phase 1: age every attached parasite's starvation clock, clear its
/// per-tick solve log, and pay the standing bonus to parasites that have
/// solved anything before.
pub fn prescan_parasites(world: &mut World) {
    let bonus = world.config.parasite_standing_bonus;

    for (slot, host) in world.population.iter_mut() {
        let Some(parasite) = host.parasite_mut() else {
            continue;
        };
        let state = &mut parasite.body_mut().state;
        state.last_solved_tasks.clear();
        state.updates_since_task += 1;

        if state.has_completed_any_task() {
            state.add_points(bonus);
            world.commands.queue_parasite(slot);
        }
    }
}

/// Phase 2: run every occupied slot in `schedule` order. Hosts run first,
/// then their parasite; parasites that die are detached on the spot.
///
/// Returns the number of parasites that died.
pub fn execute_organisms(world: &mut World, schedule: &[SlotIndex]) -> usize {
    let tick = world.tick;
    let mut ctx = TickContext::new(
        &world.config,
        &mut world.rng,
        &mut world.commands,
        tick,
        world.injected_at,
    );
    let stipend = (tick <= ctx.config.early_tick_limit).then_some(ctx.config.early_tick_stipend);
    let life_support = ctx.in_protection_window();
    let mut parasite_deaths = 0;

    for &slot in schedule {
        let Some(host) = world.population.get_mut(slot) else {
            continue;
        };

        host.process(slot, &mut ctx);
        if let Some(stipend) = stipend {
            host.add_points(stipend);
        }

        let Some(parasite) = host.parasite_mut() else {
            continue;
        };
        parasite.process(slot, &mut ctx);
        if life_support {
            parasite.add_points(ctx.config.parasite_life_support);
        }

        if parasite.is_dead(ctx.config) {
            trace!(
                tick,
                slot = %slot,
                points = parasite.points(),
                idle = parasite.body().state.updates_since_task,
                "parasite died"
            );
            host.remove_parasite();
            parasite_deaths += 1;
        }
    }

    parasite_deaths
}

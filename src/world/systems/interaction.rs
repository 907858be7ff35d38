//! Host/parasite economic interaction

use crate::core::config::TaskMatching;
use crate::organism::{Host, Lifecycle, Parasite};
use crate::world::scheduler::World;

/// Whether `parasite` is exploiting a predicate `host` has solved
pub fn solved_same_task(host: &Host, parasite: &Parasite, mode: TaskMatching) -> bool {
    let host_flags = &host.body().state.task_flags;
    let parasite_state = &parasite.body().state;

    match mode {
        TaskMatching::StickyFlags => host_flags.shares_any(&parasite_state.task_flags),
        TaskMatching::LastSolved => parasite_state
            .last_solved_tasks
            .iter()
            .any(|&task| host_flags.is_set(task)),
    }
}

/// Phase 4: matching parasites feed on their hosts and queue for
/// reproduction. Hosts are shielded during the protection window.
///
/// Returns the number of matching pairs.
pub fn resolve_interactions(world: &mut World) -> usize {
    let reward = world.config.reward;
    let mode = world.config.task_matching;
    let shielded = world.in_protection_window();
    let mut matches = 0;

    for (slot, host) in world.population.iter_mut() {
        let Some(parasite) = host.parasite() else {
            continue;
        };
        if !solved_same_task(host, parasite, mode) {
            continue;
        }

        // Host loses `drain`, parasite gains three times as much
        let drain = parasite.virulence * reward;
        if let Some(parasite) = host.parasite_mut() {
            parasite.add_points(3.0 * drain);
        }
        if !shielded {
            host.add_points(-drain);
        }
        world.commands.queue_parasite(slot);
        matches += 1;
    }

    matches
}

//! Host births, viable-host enumeration and parasite spread

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::core::config::BirthPolicy;
use crate::core::types::SlotIndex;
use crate::organism::{Host, Lifecycle};
use crate::world::scheduler::World;

/// Result of draining the parasite queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParasiteSpread {
    /// Offspring attached to a new host
    pub infections: usize,
    /// Offspring dropped for lack of a viable host
    pub discarded: usize,
}

/// Phase 5: drain the host queue. Each parent still in its slot pays for
/// one offspring, which lands where the birth policy says.
///
/// Returns the number of births.
pub fn reproduce_hosts(world: &mut World) -> usize {
    let queued = world.commands.take_host_births();
    let cost = world.config.host_reproduction_cost;
    // Slots refilled this phase hold a newborn, not the organism that queued
    let mut filled: Vec<SlotIndex> = Vec::new();

    for parent_slot in queued {
        if filled.contains(&parent_slot) {
            continue;
        }
        let Some(parent) = world.population.get_mut(parent_slot) else {
            continue;
        };

        let child = parent.check_reproduction(&world.config, &mut world.rng);
        parent.add_points(-cost);
        parent.body_mut().reset_age();

        let target = choose_birth_slot(world, parent_slot);
        trace!(tick = world.tick, parent = %parent_slot, target = %target, "host born");
        world.population.place(target, child);
        filled.push(target);
    }

    filled.len()
}

/// Pick the slot a newborn of the host at `parent` is placed into
pub fn choose_birth_slot(world: &mut World, parent: SlotIndex) -> SlotIndex {
    let slots = world.population.len();

    match world.config.birth_policy {
        BirthPolicy::ParentSlot => parent,
        BirthPolicy::Random => {
            let first = SlotIndex(world.rng.gen_range(0..slots));
            let holds_solver = world
                .population
                .get(first)
                .is_some_and(|host| host.body().state.has_completed_any_task());
            if holds_solver {
                SlotIndex(world.rng.gen_range(0..slots))
            } else {
                first
            }
        }
        BirthPolicy::Neighbor => {
            let neighbors = world.population.grid().neighbors(parent);
            neighbors.choose(&mut world.rng).copied().unwrap_or(parent)
        }
    }
}

/// Phase 6: unparasitized hosts that may receive a parasite offspring.
/// During the protection window any host qualifies; afterwards only hosts
/// that have solved something.
pub fn viable_hosts(world: &World) -> Vec<SlotIndex> {
    let open = world.in_protection_window();

    world
        .population
        .iter()
        .filter(|(_, host)| !host.has_parasite())
        .filter(|(_, host)| open || host.body().state.has_completed_any_task())
        .map(|(slot, _)| slot)
        .collect()
}

/// Phase 7: drain the parasite queue. A queued parasite keeps producing
/// offspring while it can pay; each offspring infects a random viable host
/// or, when none are left, is discarded with the cost already paid.
pub fn reproduce_parasites(world: &mut World, mut viable: Vec<SlotIndex>) -> ParasiteSpread {
    let queued = world.commands.take_parasite_births();
    let threshold = world.config.parasite_reproduce_threshold;
    let cost = world.config.parasite_reproduction_cost;
    let mut spread = ParasiteSpread::default();
    let mut infected: Vec<SlotIndex> = Vec::new();

    for slot in queued {
        if infected.contains(&slot) {
            continue;
        }

        loop {
            let Some(parent) = world.population.get_mut(slot).and_then(Host::parasite_mut) else {
                break;
            };
            if parent.points() < threshold {
                break;
            }

            let child = parent.check_reproduction(&world.config, &mut world.rng);
            parent.add_points(-cost);

            if viable.is_empty() {
                trace!(tick = world.tick, parent = %slot, "parasite offspring discarded");
                spread.discarded += 1;
                break;
            }

            let pick = world.rng.gen_range(0..viable.len());
            let target = viable.swap_remove(pick);
            if let Some(host) = world.population.get_mut(target) {
                trace!(tick = world.tick, parent = %slot, target = %target, "parasite spread");
                host.set_parasite(child);
                infected.push(target);
                spread.infections += 1;
            }
        }
    }

    spread
}

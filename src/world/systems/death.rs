//! Host death pass

use tracing::trace;

use crate::core::types::SlotIndex;
use crate::organism::Lifecycle;
use crate::world::scheduler::World;

/// Phase 3: clear every slot whose host is too old or in debt. The
/// attached parasite is dropped with its host.
///
/// Returns the number of hosts removed.
pub fn remove_dead_hosts(world: &mut World, schedule: &[SlotIndex]) -> usize {
    let mut deaths = 0;

    for &slot in schedule {
        let dead = world
            .population
            .get(slot)
            .is_some_and(|host| host.is_dead(&world.config));
        if !dead {
            continue;
        }

        if let Some(host) = world.population.remove(slot) {
            trace!(
                tick = world.tick,
                slot = %slot,
                age = host.body().age(),
                points = host.points(),
                parasite = host.has_parasite(),
                "host died"
            );
            deaths += 1;
        }
    }

    deaths
}

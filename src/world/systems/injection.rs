//! Population seeding and parasite injection

use rand::seq::{index, SliceRandom};
use tracing::info;

use crate::core::types::SlotIndex;
use crate::organism::{Host, Parasite};
use crate::world::scheduler::World;

/// Place `num_start` fresh hosts at distinct random empty slots.
///
/// Returns how many were placed; fewer than asked when the grid fills up.
pub fn seed_population(world: &mut World) -> usize {
    let empty = world.population.empty_slots();
    let wanted = world.config.num_start.min(empty.len());
    let picks = index::sample(&mut world.rng, empty.len(), wanted);

    for i in picks.into_iter() {
        let host = Host::spawn(&world.config, &mut world.rng);
        world.population.place(empty[i], host);
    }

    info!(hosts = wanted, slots = world.population.len(), "population seeded");
    wanted
}

/// Build `num_parasites` parasites and attach them, one each, to randomly
/// ordered unparasitized hosts. Parasites left over when hosts run out are
/// dropped. The first injection starts the bonus window.
///
/// Returns the number attached.
pub fn inject_parasites(world: &mut World) -> usize {
    let parasites: Vec<Parasite> = (0..world.config.num_parasites)
        .map(|_| Parasite::spawn(&world.config, &mut world.rng))
        .collect();

    let mut eligible: Vec<SlotIndex> = world
        .population
        .iter()
        .filter(|(_, host)| !host.has_parasite())
        .map(|(slot, _)| slot)
        .collect();
    eligible.shuffle(&mut world.rng);

    let mut attached = 0;
    for (slot, parasite) in eligible.into_iter().zip(parasites) {
        if let Some(host) = world.population.get_mut(slot) {
            host.set_parasite(parasite);
            attached += 1;
        }
    }

    world.mark_injection();
    info!(
        tick = world.tick,
        requested = world.config.num_parasites,
        attached,
        "parasites injected"
    );
    attached
}

//! Scenario tests for the world tick
//!
//! Each test builds a tiny grid by hand, then drives either a full
//! `World::update` or a single phase and checks the economic outcome.

use coevo::core::config::{BirthPolicy, SimulationConfig, TaskMatching};
use coevo::core::types::SlotIndex;
use coevo::organism::{Host, Lifecycle};
use coevo::tasks::TaskId;
use coevo::vm::{Instruction, Program};
use coevo::world::systems::{
    choose_birth_slot, inject_parasites, prescan_parasites, reproduce_hosts, reproduce_parasites,
    resolve_interactions, viable_hosts,
};
use coevo::world::World;
use rand::Rng;

/// A program that does nothing, so points only move when the test says so
fn idle() -> Program {
    Program::new(vec![Instruction::nop()])
}

fn quiet_config() -> SimulationConfig {
    SimulationConfig {
        grid_width: 3,
        grid_height: 3,
        num_start: 0,
        life_span: 10,
        early_tick_limit: 0,
        mutation_rate: 0.0,
        parasite_mutation_rate: 0.0,
        // No automatic injection and no bonus window: parasites earn and
        // hosts pay at full rate from the start
        inject_parasites_at: 0,
        bonus_update_limit: 0,
        ..Default::default()
    }
}

fn place_host(world: &mut World, slot: usize) -> SlotIndex {
    let host = world.spawn_host(idle());
    world.inject_host(host, SlotIndex(slot));
    SlotIndex(slot)
}

fn host(world: &World, slot: SlotIndex) -> &Host {
    world.population.get(slot).expect("host should be present")
}

fn host_mut(world: &mut World, slot: SlotIndex) -> &mut Host {
    world.population.get_mut(slot).expect("host should be present")
}

#[test]
fn test_dead_host_is_gone_after_update() {
    let mut world = World::new(quiet_config()).unwrap();
    let slot = place_host(&mut world, 4);
    {
        let state = &mut host_mut(&mut world, slot).body_mut().state;
        state.points = -0.01;
        state.age = 11;
    }

    let outcome = world.update();

    assert!(world.population.get(slot).is_none(), "dead host must be cleared");
    assert_eq!(outcome.host_deaths, 1);
    assert_eq!(outcome.host_births, 0);
    assert_eq!(world.host_count(), 0);
    assert_eq!(world.stats().deaths, 1);
}

#[test]
fn test_parasite_dies_with_its_host() {
    let mut world = World::new(quiet_config()).unwrap();
    let slot = place_host(&mut world, 0);
    let mut parasite = world.spawn_parasite(idle());
    parasite.body_mut().state.points = 5.0;
    assert!(world.infect(slot, parasite).is_ok());
    host_mut(&mut world, slot).body_mut().state.age = 11;

    let outcome = world.update();

    assert_eq!(outcome.host_deaths, 1);
    assert_eq!(outcome.parasite_deaths, 0, "parasite was alive when its host died");
    assert_eq!(world.parasite_count(), 0);
    assert!(world.population.get(slot).is_none());
}

#[test]
fn test_virulence_transfer_outside_bonus_window() {
    let mut world = World::new(quiet_config()).unwrap();
    let slot = place_host(&mut world, 2);
    host_mut(&mut world, slot).body_mut().state.task_flags.set(TaskId::Equ);

    let mut parasite = world.spawn_parasite(idle());
    parasite.body_mut().state.task_flags.set(TaskId::Equ);
    assert_eq!(parasite.virulence, 0.8);
    assert!(world.infect(slot, parasite).is_ok());

    let matches = resolve_interactions(&mut world);

    let host = host(&world, slot);
    assert_eq!(matches, 1);
    assert_eq!(host.points(), -16.0);
    assert_eq!(host.parasite().map(|p| p.points()), Some(48.0));
    assert_eq!(world.commands.parasite_births(), &[slot]);
}

#[test]
fn test_host_shielded_during_protection_window() {
    let config = SimulationConfig {
        bonus_update_limit: 100,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let slot = place_host(&mut world, 2);
    host_mut(&mut world, slot).body_mut().state.task_flags.set(TaskId::Xor);

    let mut parasite = world.spawn_parasite(idle());
    parasite.body_mut().state.task_flags.set(TaskId::Xor);
    assert!(world.infect(slot, parasite).is_ok());

    resolve_interactions(&mut world);

    let host = host(&world, slot);
    assert_eq!(host.points(), 0.0, "host is shielded");
    assert_eq!(host.parasite().map(|p| p.points()), Some(48.0));
}

#[test]
fn test_no_match_means_no_transfer() {
    let config = SimulationConfig {
        task_matching: TaskMatching::LastSolved,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let slot = place_host(&mut world, 1);
    host_mut(&mut world, slot).body_mut().state.task_flags.set(TaskId::Nor);

    // Sticky flags overlap, but nothing was solved this tick
    let mut parasite = world.spawn_parasite(idle());
    parasite.body_mut().state.task_flags.set(TaskId::Nor);
    assert!(world.infect(slot, parasite).is_ok());

    assert_eq!(resolve_interactions(&mut world), 0);
    assert_eq!(host(&world, slot).points(), 0.0);
    assert!(world.commands.parasite_births().is_empty());
}

#[test]
fn test_parent_slot_birth_replaces_parent() {
    let config = SimulationConfig {
        birth_policy: BirthPolicy::ParentSlot,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let slot = place_host(&mut world, 4);
    host_mut(&mut world, slot).body_mut().state.points = 30.0;
    world.commands.queue_host(slot);

    assert_eq!(reproduce_hosts(&mut world), 1);

    let newborn = host(&world, slot);
    assert_eq!(newborn.points(), 0.0);
    assert_eq!(newborn.body().age(), 0);
    assert_eq!(world.host_count(), 1);
}

#[test]
fn test_neighbor_birth_pays_cost_and_resets_parent_age() {
    let mut world = World::new(quiet_config()).unwrap();
    let slot = place_host(&mut world, 4);
    {
        let state = &mut host_mut(&mut world, slot).body_mut().state;
        state.points = 30.0;
        state.age = 7;
    }
    world.commands.queue_host(slot);

    assert_eq!(reproduce_hosts(&mut world), 1);

    let parent = host(&world, slot);
    assert_eq!(parent.points(), 25.0);
    assert_eq!(parent.body().age(), 0);
    assert_eq!(world.host_count(), 2, "child lands next to its parent");
}

#[test]
fn test_newborn_does_not_reproduce_in_its_birth_tick() {
    // On a 2x1 torus every neighbour of slot 0 is slot 1
    let config = SimulationConfig {
        grid_width: 2,
        grid_height: 1,
        birth_policy: BirthPolicy::Neighbor,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let first = place_host(&mut world, 0);
    let second = place_host(&mut world, 1);
    host_mut(&mut world, first).body_mut().state.points = 30.0;
    {
        let state = &mut host_mut(&mut world, second).body_mut().state;
        state.points = 40.0;
        state.age = 5;
    }
    world.commands.queue_host(first);
    world.commands.queue_host(second);

    assert_eq!(reproduce_hosts(&mut world), 1);

    let newborn = host(&world, second);
    assert_eq!(newborn.points(), 0.0);
    assert_eq!(newborn.body().age(), 0);
    assert_eq!(host(&world, first).points(), 25.0);
    assert_eq!(world.host_count(), 2);
}

#[test]
fn test_random_birth_retries_once_over_a_solver() {
    let config = SimulationConfig {
        birth_policy: BirthPolicy::Random,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    for slot in 0..9 {
        let placed = place_host(&mut world, slot);
        host_mut(&mut world, placed).body_mut().state.task_flags.set(TaskId::Not);
    }

    for _ in 0..20 {
        let mut replay = world.rng.clone();
        let _first: usize = replay.gen_range(0..9);
        let second = replay.gen_range(0..9);

        // The second pick is kept even though it also holds a solver
        assert_eq!(choose_birth_slot(&mut world, SlotIndex(4)), SlotIndex(second));
        assert_eq!(world.rng.gen::<u64>(), replay.gen::<u64>(), "exactly two picks");
    }
}

#[test]
fn test_random_birth_keeps_a_non_solver_pick() {
    let config = SimulationConfig {
        birth_policy: BirthPolicy::Random,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let parent = place_host(&mut world, 4);

    for _ in 0..20 {
        let mut replay = world.rng.clone();
        let first = replay.gen_range(0..9);

        // Empty slots and the non-solver parent are both acceptable targets
        assert_eq!(choose_birth_slot(&mut world, parent), SlotIndex(first));
        assert_eq!(world.rng.gen::<u64>(), replay.gen::<u64>(), "exactly one pick");
    }
}

#[test]
fn test_early_ticks_pay_host_stipend() {
    let config = SimulationConfig {
        early_tick_limit: 2,
        early_tick_stipend: 1.0,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let slot = place_host(&mut world, 4);

    let mut points = Vec::new();
    for _ in 0..3 {
        world.update();
        points.push(host(&world, slot).points());
    }

    assert_eq!(points, vec![1.0, 2.0, 2.0]);
}

#[test]
fn test_standing_bonus_pays_and_queues_flagged_parasites() {
    let mut world = World::new(quiet_config()).unwrap();
    let flagged = place_host(&mut world, 0);
    let plain = place_host(&mut world, 8);
    for slot in [flagged, plain] {
        host_mut(&mut world, slot).body_mut().state.points = 1000.0;
    }

    let mut parasite = world.spawn_parasite(idle());
    parasite.body_mut().state.task_flags.set(TaskId::Equ);
    assert!(world.infect(flagged, parasite).is_ok());
    let parasite = world.spawn_parasite(idle());
    assert!(world.infect(plain, parasite).is_ok());

    prescan_parasites(&mut world);
    assert_eq!(world.commands.parasite_births(), &[flagged]);
    assert_eq!(host(&world, flagged).parasite().map(|p| p.points()), Some(0.5));
    assert_eq!(host(&world, plain).parasite().map(|p| p.points()), Some(0.0));
    world.commands.clear();

    // Second bonus reaches the threshold; the offspring finds no solver host
    let outcome = world.update();
    assert_eq!(outcome.discarded_parasites, 1);
    assert_eq!(host(&world, flagged).parasite().map(|p| p.points()), Some(0.0));
    assert!(world.commands.is_empty());
}

#[test]
fn test_life_support_during_protection_window() {
    let config = SimulationConfig {
        bonus_update_limit: 10,
        parasite_life_support: 0.5,
        parasite_standing_bonus: 0.0,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let slot = place_host(&mut world, 4);
    host_mut(&mut world, slot).body_mut().state.points = 1000.0;
    let parasite = world.spawn_parasite(idle());
    assert!(world.infect(slot, parasite).is_ok());

    let mut points = Vec::new();
    for _ in 0..6 {
        world.update();
        points.push(host(&world, slot).parasite().map(|p| p.points()));
    }

    // Protection covers ticks 1 to 4 after injection at tick 0
    assert_eq!(
        points,
        vec![Some(0.5), Some(1.0), Some(1.5), Some(2.0), Some(2.0), Some(2.0)]
    );
}

#[test]
fn test_stale_queue_entries_are_skipped() {
    let mut world = World::new(quiet_config()).unwrap();
    world.commands.queue_host(SlotIndex(3));
    world.commands.queue_parasite(SlotIndex(5));

    assert_eq!(reproduce_hosts(&mut world), 0);
    let spread = reproduce_parasites(&mut world, Vec::new());
    assert_eq!(spread.infections, 0);
    assert_eq!(spread.discarded, 0);
    assert_eq!(world.host_count(), 0);
}

#[test]
fn test_parasite_spreads_until_hosts_run_out() {
    let mut world = World::new(quiet_config()).unwrap();
    let carrier = place_host(&mut world, 0);
    let solver_a = place_host(&mut world, 1);
    let solver_b = place_host(&mut world, 2);
    let _idle = place_host(&mut world, 3);
    host_mut(&mut world, solver_a).body_mut().state.task_flags.set(TaskId::Not);
    host_mut(&mut world, solver_b).body_mut().state.task_flags.set(TaskId::And);

    let mut parasite = world.spawn_parasite(idle());
    parasite.body_mut().state.points = 3.5;
    assert!(world.infect(carrier, parasite).is_ok());

    // Outside the protection window only solvers are open to infection
    let viable = viable_hosts(&world);
    assert_eq!(viable, vec![solver_a, solver_b]);

    world.commands.queue_parasite(carrier);
    let spread = reproduce_parasites(&mut world, viable);

    assert_eq!(spread.infections, 2);
    assert_eq!(spread.discarded, 1, "third offspring has nowhere to go");
    assert_eq!(host(&world, carrier).parasite().map(|p| p.points()), Some(0.5));
    assert!(host(&world, solver_a).has_parasite());
    assert!(host(&world, solver_b).has_parasite());
    assert!(!host(&world, SlotIndex(3)).has_parasite());
}

#[test]
fn test_any_host_is_viable_during_protection_window() {
    let config = SimulationConfig {
        bonus_update_limit: 100,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    place_host(&mut world, 0);
    place_host(&mut world, 5);
    let carrier = place_host(&mut world, 8);

    // Nothing injected yet, so the window is closed
    assert!(viable_hosts(&world).is_empty());

    let parasite = world.spawn_parasite(idle());
    assert!(world.infect(carrier, parasite).is_ok());
    assert_eq!(viable_hosts(&world), vec![SlotIndex(0), SlotIndex(5)]);
}

#[test]
fn test_windows_follow_the_actual_injection_tick() {
    let config = SimulationConfig {
        num_parasites: 1,
        bonus_update_limit: 100,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let slot = place_host(&mut world, 4);
    host_mut(&mut world, slot).body_mut().state.task_flags.set(TaskId::Equ);

    world.tick = 500;
    assert!(!world.in_protection_window(), "no parasites, no window");
    assert_eq!(world.inject_parasites(), 1);
    assert_eq!(world.injected_at, Some(500));
    if let Some(parasite) = host_mut(&mut world, slot).parasite_mut() {
        parasite.body_mut().state.task_flags.set(TaskId::Equ);
    }

    resolve_interactions(&mut world);
    assert_eq!(host(&world, slot).points(), 0.0, "shielded right after injection");
    assert_eq!(host(&world, slot).parasite().map(|p| p.points()), Some(48.0));

    world.tick = 550;
    resolve_interactions(&mut world);
    assert_eq!(host(&world, slot).points(), -16.0, "shield lifts halfway through");
    assert_eq!(host(&world, slot).parasite().map(|p| p.points()), Some(96.0));
}

#[test]
fn test_injection_is_capped_by_eligible_hosts() {
    let config = SimulationConfig {
        num_parasites: 30,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    assert_eq!(inject_parasites(&mut world), 0, "empty grid takes no parasites");

    for slot in [0, 3, 6, 7] {
        place_host(&mut world, slot);
    }
    assert_eq!(inject_parasites(&mut world), 4);
    assert_eq!(world.parasite_count(), 4);

    // Everyone is already parasitized
    assert_eq!(inject_parasites(&mut world), 0);
}

#[test]
fn test_starving_parasite_is_detached() {
    let config = SimulationConfig {
        parasite_starvation_ticks: 3,
        parasite_standing_bonus: 0.0,
        ..quiet_config()
    };
    let mut world = World::new(config).unwrap();
    let slot = place_host(&mut world, 4);
    host_mut(&mut world, slot).body_mut().state.points = 1000.0;
    let parasite = world.spawn_parasite(idle());
    assert!(world.infect(slot, parasite).is_ok());

    let mut detached_at = None;
    for _ in 0..5 {
        let outcome = world.update();
        if outcome.parasite_deaths > 0 {
            detached_at = Some(outcome.tick);
            break;
        }
    }

    assert_eq!(detached_at, Some(4), "idle parasite dies once its clock passes 3");
    assert!(!host(&world, slot).has_parasite());
}

#[test]
fn test_ancestor_population_grows() {
    let config = SimulationConfig {
        grid_width: 8,
        grid_height: 8,
        num_start: 4,
        seed_with_ancestor: true,
        mutation_rate: 0.0,
        inject_parasites_at: 10_000,
        ..Default::default()
    };
    let mut world = World::seeded(config).unwrap();
    world.run(60);

    let stats = world.stats();
    assert!(
        stats.organisms > 4,
        "NAND ancestors should have reproduced, got {} hosts",
        stats.organisms
    );
    assert!(stats.host_solver_count(TaskId::Nand) > 0);
    assert!(world.totals.host_births > 0);
}

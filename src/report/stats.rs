//! Per-tick population counters

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;
use crate::organism::Lifecycle;
use crate::tasks::{TaskFlags, TaskId};
use crate::world::World;

/// Snapshot of the counters reported for a sampled tick
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    pub tick: Tick,
    /// Occupied slots (hosts)
    pub organisms: usize,
    /// Hosts with each predicate's sticky flag set, in `TaskId::ALL` order
    pub host_solvers: [usize; TaskId::COUNT],
    /// Attached parasites with each predicate's sticky flag set
    pub parasite_solvers: [usize; TaskId::COUNT],
    /// Cumulative host deaths
    pub deaths: usize,
    /// Live (attached) parasites
    pub parasites: usize,
}

impl TickStats {
    pub fn collect(world: &World) -> Self {
        let mut stats = Self {
            tick: world.tick,
            deaths: world.totals.host_deaths,
            ..Default::default()
        };

        for (_, host) in world.population.iter() {
            stats.organisms += 1;
            tally(&mut stats.host_solvers, &host.body().state.task_flags);

            if let Some(parasite) = host.parasite() {
                stats.parasites += 1;
                tally(&mut stats.parasite_solvers, &parasite.body().state.task_flags);
            }
        }

        stats
    }

    pub fn host_solver_count(&self, task: TaskId) -> usize {
        self.host_solvers[task.index()]
    }

    pub fn parasite_solver_count(&self, task: TaskId) -> usize {
        self.parasite_solvers[task.index()]
    }
}

fn tally(counts: &mut [usize; TaskId::COUNT], flags: &TaskFlags) {
    for task in flags.iter() {
        counts[task.index()] += 1;
    }
}

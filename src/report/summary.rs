//! End-of-run summary and serialization

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{SlotIndex, Tick};
use crate::organism::Lifecycle;
use crate::report::stats::TickStats;
use crate::tasks::TaskId;
use crate::world::{RunTotals, World};

/// Complete run output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: Tick,
    pub simulation_time_ms: u64,
    pub totals: RunTotals,
    pub final_stats: TickStats,
    pub final_population: Vec<HostSnapshot>,
}

/// One occupied slot at the end of the run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub slot: SlotIndex,
    pub points: f64,
    pub age: u32,
    /// First solved predicate, if any
    pub dominant_task: Option<TaskId>,
    pub tasks_solved: usize,
    pub parasite: Option<ParasiteSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParasiteSnapshot {
    pub points: f64,
    pub virulence: f64,
    pub dominant_task: Option<TaskId>,
    pub updates_since_task: u32,
}

impl RunSummary {
    pub fn new(world: &World, elapsed: Duration) -> Self {
        let final_population = world
            .population
            .iter()
            .map(|(slot, host)| {
                let state = &host.body().state;
                HostSnapshot {
                    slot,
                    points: state.points,
                    age: state.age,
                    dominant_task: state.dominant_task(),
                    tasks_solved: state.task_flags.count(),
                    parasite: host.parasite().map(|parasite| {
                        let p = &parasite.body().state;
                        ParasiteSnapshot {
                            points: p.points,
                            virulence: parasite.virulence,
                            dominant_task: p.dominant_task(),
                            updates_since_task: p.updates_since_task,
                        }
                    }),
                }
            })
            .collect();

        Self {
            seed: world.config.seed,
            ticks: world.tick,
            simulation_time_ms: elapsed.as_millis() as u64,
            totals: world.totals,
            final_stats: TickStats::collect(world),
            final_population,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "Simulated {} ticks in {}ms\n{} hosts, {} parasites, {} births, {} deaths, {} infections",
            self.ticks,
            self.simulation_time_ms,
            self.final_stats.organisms,
            self.final_stats.parasites,
            self.totals.host_births,
            self.totals.host_deaths,
            self.totals.infections,
        )
    }
}

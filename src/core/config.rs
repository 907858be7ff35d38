//! Run parameters for a coevolution experiment
//!
//! Every tunable of the host/parasite economy lives here. The config is
//! loaded once (TOML or defaults), validated, and then owned by the `World`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CoevoError, Result};
use crate::core::types::{GridShape, Tick};

/// Where a newborn host is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirthPolicy {
    /// Offspring replaces its parent in the parent's own slot
    ParentSlot,
    /// Uniformly random slot, retried once if it would overwrite a task solver
    Random,
    /// Random slot in the parent's Moore neighbourhood on the grid
    Neighbor,
}

/// How `solved_same_task` decides whether a parasite matches its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMatching {
    /// Any predicate flagged on both host and parasite
    StickyFlags,
    /// Any predicate the parasite solved this tick that the host has flagged
    LastSolved,
}

/// What happens to a parasite's sticky task flags when it reproduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParasiteFlagPolicy {
    /// Offspring inherits the parent's flags
    Keep,
    /// Offspring starts with no flags, like a host
    Clear,
}

/// Configuration for a coevolution run
///
/// Defaults reproduce the reference experiment: a 20x20 grid seeded with
/// 10 hosts, parasites arriving at tick 1500.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    // === RUN ===
    /// Seed for the world's random source. Same seed + config = same history.
    pub seed: u64,

    /// Number of hosts seeded before the first tick
    pub num_start: usize,

    /// Ticks the command-line runner executes
    pub num_updates: u64,

    /// Ticks between CSV rows written by the runner
    pub output_interval: u64,

    // === GRID ===
    /// Population grid width (slots = width * height)
    pub grid_width: usize,

    /// Population grid height
    pub grid_height: usize,

    /// Where newborn hosts land
    pub birth_policy: BirthPolicy,

    // === GENOME / VM ===
    /// Instructions in a freshly generated random program
    pub genome_length: usize,

    /// Seed hosts with the hand-written NAND ancestor instead of random programs
    pub seed_with_ancestor: bool,

    /// VM cycles executed per organism per tick
    pub cycles_per_tick: usize,

    /// Per-instruction mutation probability for host offspring
    pub mutation_rate: f64,

    /// Per-instruction mutation probability for parasite offspring
    pub parasite_mutation_rate: f64,

    // === HOST ECONOMY ===
    /// Points awarded per solved predicate
    pub reward: f64,

    /// Hosts older than this die
    pub life_span: u32,

    /// Minimum points for a host's Reproduce instruction to queue a birth
    pub host_reproduce_threshold: f64,

    /// Points a parent host pays when its offspring is placed
    pub host_reproduction_cost: f64,

    /// Ticks `<=` this pay every host a flat stipend
    pub early_tick_limit: u64,

    /// Stipend value for the early ticks
    pub early_tick_stipend: f64,

    // === PARASITES ===
    /// Number of parasites built at injection time
    pub num_parasites: usize,

    /// Tick at which parasites are injected. Ticks count from 1, so 0
    /// disables automatic injection.
    pub inject_parasites_at: u64,

    /// Scalar applied to the reward when a parasite matches its host
    ///
    /// The host loses `virulence * reward`, the parasite gains three times that.
    pub virulence: f64,

    /// Length of the bonus window after the first parasites arrive
    ///
    /// Parasites earn double task rewards for the whole window. For the first
    /// half hosts are shielded from drain, parasites get life support and any
    /// host may be infected.
    pub bonus_update_limit: u64,

    /// Points an injected parasite starts with
    pub parasite_start_points: f64,

    /// Points gate for parasite reproduction (signal and drain loop)
    pub parasite_reproduce_threshold: f64,

    /// Points a parasite pays per offspring, placed or not
    pub parasite_reproduction_cost: f64,

    /// Pre-scan bonus for parasites holding any sticky task flag
    pub parasite_standing_bonus: f64,

    /// Per-tick bonus during the protected half of the bonus window
    pub parasite_life_support: f64,

    /// A parasite dies once its points are `<=` this
    pub parasite_death_points: f64,

    /// A parasite dies once this many ticks pass without a solved task
    pub parasite_starvation_ticks: u32,

    /// Whether parasite offspring inherit sticky flags
    pub parasite_flags_on_birth: ParasiteFlagPolicy,

    /// Host/parasite match rule for the interaction pass
    pub task_matching: TaskMatching,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 3,
            num_start: 10,
            num_updates: 4000,
            output_interval: 10,

            grid_width: 20,
            grid_height: 20,
            birth_policy: BirthPolicy::Neighbor,

            genome_length: 100,
            seed_with_ancestor: false,
            cycles_per_tick: 10,
            mutation_rate: 0.02,
            parasite_mutation_rate: 0.04,

            reward: 20.0,
            life_span: 30,
            host_reproduce_threshold: 20.0,
            host_reproduction_cost: 5.0,
            early_tick_limit: 100,
            early_tick_stipend: 1.0,

            num_parasites: 30,
            inject_parasites_at: 1500,
            virulence: 0.8,
            bonus_update_limit: 2000,
            parasite_start_points: 0.0,
            parasite_reproduce_threshold: 1.0,
            parasite_reproduction_cost: 1.0,
            parasite_standing_bonus: 0.5,
            parasite_life_support: 0.5,
            parasite_death_points: -1.0,
            parasite_starvation_ticks: 100,
            parasite_flags_on_birth: ParasiteFlagPolicy::Keep,
            task_matching: TaskMatching::StickyFlags,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn grid(&self) -> GridShape {
        GridShape::new(self.grid_width, self.grid_height)
    }

    /// Ticks elapsed between the injection tick `injected_at` and `tick`.
    /// `None` when nothing has been injected yet.
    pub fn ticks_since_injection(&self, injected_at: Option<Tick>, tick: Tick) -> Option<u64> {
        injected_at.and_then(|at| tick.checked_sub(at))
    }

    /// Within the full bonus window (double parasite rewards)
    pub fn in_bonus_window(&self, injected_at: Option<Tick>, tick: Tick) -> bool {
        self.ticks_since_injection(injected_at, tick)
            .is_some_and(|elapsed| elapsed < self.bonus_update_limit)
    }

    /// Within the first half of the bonus window (host shield, life support,
    /// open infection)
    pub fn in_protection_window(&self, injected_at: Option<Tick>, tick: Tick) -> bool {
        self.ticks_since_injection(injected_at, tick)
            .is_some_and(|elapsed| elapsed < self.bonus_update_limit / 2)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(CoevoError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        let Some(slots) = self.grid_width.checked_mul(self.grid_height) else {
            return Err(CoevoError::InvalidConfig(format!(
                "grid {}x{} has too many slots",
                self.grid_width, self.grid_height
            )));
        };
        if self.num_start > slots {
            return Err(CoevoError::InvalidConfig(format!(
                "num_start ({}) exceeds the {} available slots",
                self.num_start, slots
            )));
        }

        for (name, rate) in [
            ("mutation_rate", self.mutation_rate),
            ("parasite_mutation_rate", self.parasite_mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(CoevoError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }

        // The parasite drain loop only terminates if every offspring costs something
        if self.parasite_reproduction_cost <= 0.0 {
            return Err(CoevoError::InvalidConfig(format!(
                "parasite_reproduction_cost must be positive, got {}",
                self.parasite_reproduction_cost
            )));
        }

        if self.genome_length == 0 {
            return Err(CoevoError::InvalidConfig("genome_length must be positive".into()));
        }

        if self.output_interval == 0 {
            return Err(CoevoError::InvalidConfig("output_interval must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 42
            virulence = 0.5
            birth_policy = "random"
            task_matching = "last_solved"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.virulence, 0.5);
        assert_eq!(config.birth_policy, BirthPolicy::Random);
        assert_eq!(config.task_matching, TaskMatching::LastSolved);
        assert_eq!(config.reward, 20.0);
        assert_eq!(config.life_span, 30);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = SimulationConfig::from_toml_str("not_a_field = 1");
        assert!(matches!(result, Err(CoevoError::ConfigParse(_))));
    }

    #[test]
    fn test_unparseable_value_is_rejected() {
        let result = SimulationConfig::from_toml_str("reward = \"lots\"");
        assert!(matches!(result, Err(CoevoError::ConfigParse(_))));
    }

    #[test]
    fn test_validation_rejects_bad_rates() {
        let config = SimulationConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoevoError::InvalidConfig(_))));

        let config = SimulationConfig {
            parasite_reproduction_cost: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            num_start: 401,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_grid_overflow_is_rejected() {
        let config = SimulationConfig {
            grid_width: usize::MAX,
            grid_height: 2,
            num_start: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoevoError::InvalidConfig(_))));
    }

    #[test]
    fn test_bonus_windows() {
        let config = SimulationConfig {
            inject_parasites_at: 100,
            bonus_update_limit: 40,
            ..Default::default()
        };
        let injected = Some(100);

        assert!(!config.in_bonus_window(injected, 99));
        assert!(config.in_bonus_window(injected, 100));
        assert!(config.in_bonus_window(injected, 139));
        assert!(!config.in_bonus_window(injected, 140));

        assert!(config.in_protection_window(injected, 119));
        assert!(!config.in_protection_window(injected, 120));
        assert!(!config.in_protection_window(injected, 50));
    }

    #[test]
    fn test_windows_closed_before_any_injection() {
        let config = SimulationConfig {
            inject_parasites_at: 0,
            ..Default::default()
        };
        assert_eq!(config.ticks_since_injection(None, 500), None);
        assert!(!config.in_bonus_window(None, 1));
        assert!(!config.in_protection_window(None, 500));
    }
}

pub mod config;
pub mod error;
pub mod types;

pub use config::{BirthPolicy, ParasiteFlagPolicy, SimulationConfig, TaskMatching};
pub use error::{CoevoError, Result};
pub use types::{GridShape, Role, SlotIndex, Tick};

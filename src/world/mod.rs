//! Population scheduler
//!
//! The `World` owns the slot array and runs the eight-phase tick. Phases
//! live in `systems` as free functions; reproduction requests raised while
//! organisms run are buffered in `commands` and applied in later phases.

pub mod commands;
pub mod context;
pub mod population;
pub mod scheduler;
pub mod systems;

pub use commands::CommandBuffer;
pub use context::TickContext;
pub use population::Population;
pub use scheduler::{RunTotals, TickOutcome, World};
pub use systems::{solved_same_task, ParasiteSpread};

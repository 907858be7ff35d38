//! Tick phases, each a free function over the world

mod death;
mod execution;
mod injection;
mod interaction;
mod reproduction;
pub mod reward;

pub use death::remove_dead_hosts;
pub use execution::{execute_organisms, prescan_parasites};
pub use injection::{inject_parasites, seed_population};
pub use interaction::{resolve_interactions, solved_same_task};
pub use reproduction::{
    choose_birth_slot, reproduce_hosts, reproduce_parasites, viable_hosts, ParasiteSpread,
};
pub use reward::{check_output, request_reproduction, RewardIo};

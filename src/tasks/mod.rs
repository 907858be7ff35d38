//! Logic tasks organisms are rewarded for solving

pub mod flags;
pub mod oracle;

pub use flags::TaskFlags;
pub use oracle::{evaluate, matching_tasks, TaskId};

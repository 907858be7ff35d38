//! Coevo - host/parasite coevolution of digital organisms
//!
//! Hosts run small register-machine programs on a grid and earn points by
//! emitting the result of logic operations on their inputs. Parasites ride
//! on hosts and profit when they solve the same tasks.

pub mod core;
pub mod organism;
pub mod report;
pub mod tasks;
pub mod vm;
pub mod world;

//! Organisms: the shared body, hosts and parasites

pub mod host;
pub mod lifecycle;
pub mod parasite;
pub mod state;

pub use host::Host;
pub use lifecycle::{Lifecycle, Organism};
pub use parasite::Parasite;
pub use state::{OrganismState, INPUT_BUFFER_LEN};

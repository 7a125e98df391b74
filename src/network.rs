//! Router network model: adjacency, link weights, router addresses and
//! per-router congestion flags.

mod address;
mod topology;

pub use address::is_valid_address;
pub use topology::{Link, NetworkModel};

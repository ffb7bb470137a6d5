//! Topology resolution: address generation and the defaulting pass.
//!
//! After parsing, hosts may lack an IP or MAC address. The defaulting pass
//! in [`defaults`] walks the [`crate::dsl::Program`] once and assigns them
//! from fresh [`IpGenerator`] and [`MacGenerator`] instances.

mod address;
mod defaults;

pub use address::{IpGenerator, IpPool, MacAddr, MacGenerator, DEFAULT_IP_POOL};
pub use defaults::{apply_defaults, apply_defaults_with};

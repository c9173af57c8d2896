//! Static Deploy - release deployment for packed web content
//!
//! This crate uploads a `.tgz` snapshot to a list of hosts, unpacks it into a
//! versioned release directory and repoints the `current` link at it.

pub mod archive;
pub mod cli;
pub mod deploy;
pub mod inventory;
pub mod transport;
pub mod types;

pub use deploy::{DeployError, Deployer};
pub use inventory::Inventory;
pub use types::*;

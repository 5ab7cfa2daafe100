//! Core traits for hostsync
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`InventorySource`]: Fetch the compute inventory
//! - [`HostsPublisher`]: Commit rendered hosts content to a destination

pub mod inventory;
pub mod publisher;

pub use inventory::{Address, Instance, InventorySource, NetworkInterface};
pub use publisher::HostsPublisher;

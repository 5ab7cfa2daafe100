// # hostsync-core
//
// Core library that renders a cloud compute inventory into a hosts file.
//
// ## Architecture Overview
//
// - **InventorySource**: Trait for fetching the compute inventory
// - **classify**: Picks the WAN-facing and LAN-facing address of an instance
// - **render**: Turns a classified instance into `ip<TAB><TAB>fqdn` lines
// - **assemble**: Base template plus every rendered line, in inventory order
// - **HostsPublisher**: Trait for committing the content (stdout or atomic file replace)
// - **HostsEngine**: Runs fetch → assemble → publish once
//
// ## Design Principles
//
// 1. **Stateless**: Every run starts from scratch; the hosts file is the only persistence
// 2. **Deterministic**: Same inventory, config and base template give the same bytes
// 3. **Atomic**: A published file is either the old one or the complete new one
// 4. **Library-First**: The pipeline works without the binary and without a cloud

pub mod assemble;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod publish;
pub mod render;
pub mod traits;

// Re-export core types for convenience
pub use assemble::{assemble, assemble_with_stats, load_base, Assembly, AssemblyStats};
pub use classify::{
    classify, classify_lan, classify_wan, first_address, Classification, PrefixTable,
};
pub use config::{CloudConfig, ConfigFile, Destination, HostsConfig, OutputConfig};
pub use engine::{HostsEngine, RunReport};
pub use error::{Error, Result};
pub use inventory::StaticInventory;
pub use publish::{publisher_for, AtomicFilePublisher, MemoryPublisher, StdoutPublisher};
pub use render::{display_name, render, RenderedLine};
pub use traits::{Address, HostsPublisher, Instance, InventorySource, NetworkInterface};

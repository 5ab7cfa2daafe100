// # Inventory Source Implementations
//
// Built-in implementations of the InventorySource trait. Cloud-backed
// sources live in their own crates (e.g. `hostsync-openstack`).

pub mod memory;

pub use memory::StaticInventory;

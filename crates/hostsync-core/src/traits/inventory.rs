// # Inventory Source Trait
//
// Defines the interface for fetching the compute inventory that is rendered
// into the hosts file, together with the inventory data model.
//
// ## Implementations
//
// - OpenStack (Keystone + Nova): `hostsync-openstack` crate
// - Fixed list: `hostsync_core::inventory::StaticInventory`
//
// ## Usage
//
// ```rust,ignore
// use hostsync_core::InventorySource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* InventorySource implementation */;
//
//     for instance in source.instances().await? {
//         println!("{} has {} interface(s)", instance.name, instance.interfaces.len());
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single network address as reported by the inventory
///
/// The address is kept as text: classification is a textual prefix match,
/// not a parse into `IpAddr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Dotted-decimal IPv4 text
    pub ip: String,
}

impl Address {
    pub fn new(ip: impl Into<String>) -> Self {
        Self { ip: ip.into() }
    }
}

/// A named network interface with its ordered address list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    /// Interface (network) name, e.g. "public" or "ext-net"
    pub name: String,
    /// Addresses in the order the inventory listed them
    pub addresses: Vec<Address>,
}

impl NetworkInterface {
    /// Create an interface from a name and a list of address strings
    pub fn new<I, S>(name: impl Into<String>, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            addresses: addresses.into_iter().map(Address::new).collect(),
        }
    }
}

/// A compute instance from the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Provider-assigned identifier
    pub id: String,
    /// Instance name; empty while provisioning or when unnamed
    pub name: String,
    /// Interfaces in the order the inventory supplied them
    pub interfaces: Vec<NetworkInterface>,
}

impl Instance {
    /// Create an instance without interfaces
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            interfaces: Vec::new(),
        }
    }

    /// Append an interface
    pub fn with_interface<I, S>(mut self, name: impl Into<String>, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interfaces.push(NetworkInterface::new(name, addresses));
        self
    }

    /// Whether this instance has a usable name
    ///
    /// Unnamed instances never reach classification.
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Trait for inventory source implementations
///
/// A source is queried exactly once per run. It must not retry: any failure
/// (authentication, network, malformed response) is returned as-is and
/// aborts the run before anything is published.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Fetch all instances that should appear in the hosts file
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Instance>)`: Instances in inventory order
    /// - `Err(Error)`: If the inventory could not be retrieved
    async fn instances(&self) -> Result<Vec<Instance>, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

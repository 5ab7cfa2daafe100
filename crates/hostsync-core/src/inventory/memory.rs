// # Static Inventory
//
// InventorySource backed by a fixed list of instances.
//
// ## When to Use
//
// - Embedding hostsync with an inventory fetched by other means
// - Tests
// - Rendering a snapshot that was saved as JSON

use async_trait::async_trait;

use crate::traits::{Instance, InventorySource};
use crate::Error;

/// Inventory that always returns the same instances, in the same order
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    instances: Vec<Instance>,
}

impl StaticInventory {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self { instances }
    }

    /// Load a snapshot serialized as a JSON array of instances
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[async_trait]
impl InventorySource for StaticInventory {
    async fn instances(&self) -> Result<Vec<Instance>, Error> {
        Ok(self.instances.clone())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

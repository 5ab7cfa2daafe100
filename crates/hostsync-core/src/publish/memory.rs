// # Memory Publisher
//
// In-memory implementation of HostsPublisher.
//
// ## Purpose
//
// Captures every published payload instead of writing it anywhere. Useful
// for embedding hostsync in another program that wants the rendered content,
// and for tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::traits::HostsPublisher;
use crate::Error;

/// In-memory publisher
///
/// Clones share the same buffer, so a test can keep one handle and pass
/// another to the engine.
///
/// # Example
///
/// ```rust,no_run
/// use hostsync_core::publish::MemoryPublisher;
/// use hostsync_core::traits::HostsPublisher;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let publisher = MemoryPublisher::new();
///     publisher.publish(b"10.0.0.5\t\tweb1.internal\n").await?;
///
///     assert_eq!(publisher.last().await, Some(b"10.0.0.5\t\tweb1.internal\n".to_vec()));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    published: Arc<RwLock<Vec<Vec<u8>>>>,
}

impl MemoryPublisher {
    /// Create an empty memory publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently published payload
    pub async fn last(&self) -> Option<Vec<u8>> {
        self.published.read().await.last().cloned()
    }

    /// Every payload, oldest first
    pub async fn all(&self) -> Vec<Vec<u8>> {
        self.published.read().await.clone()
    }

    /// Number of publish calls
    pub async fn len(&self) -> usize {
        self.published.read().await.len()
    }

    /// Whether nothing has been published yet
    pub async fn is_empty(&self) -> bool {
        self.published.read().await.is_empty()
    }
}

#[async_trait]
impl HostsPublisher for MemoryPublisher {
    async fn publish(&self, content: &[u8]) -> Result<(), Error> {
        self.published.write().await.push(content.to_vec());
        Ok(())
    }

    fn destination(&self) -> String {
        "<memory>".to_string()
    }
}

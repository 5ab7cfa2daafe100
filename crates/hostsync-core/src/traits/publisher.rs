// # Hosts Publisher Trait
//
// Defines the interface for committing assembled hosts-file content to its
// destination.
//
// ## Implementations
//
// - `AtomicFilePublisher`: temp file + rename onto the target path
// - `StdoutPublisher`: plain write to standard output
// - `MemoryPublisher`: captures payloads in memory

use async_trait::async_trait;

/// Trait for hosts-file publishers
///
/// Publishing is single-shot: one call per run, no retries. A publisher that
/// writes a durable artifact must guarantee that readers of the destination
/// see either the previous content or the complete new content.
#[async_trait]
pub trait HostsPublisher: Send + Sync {
    /// Commit `content` to the destination
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Content fully committed
    /// - `Err(Error)`: If the write or the commit step failed
    async fn publish(&self, content: &[u8]) -> Result<(), crate::Error>;

    /// Human-readable destination (for logging)
    fn destination(&self) -> String;
}

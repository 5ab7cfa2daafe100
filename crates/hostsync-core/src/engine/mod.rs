//! Hosts engine
//!
//! The HostsEngine runs the whole pipeline once:
//! - Fetch the inventory via InventorySource
//! - Load the optional base template
//! - Classify, render and assemble every instance
//! - Publish the result via HostsPublisher
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   Vec<Instance>   ┌──────────────┐
//! │ InventorySource │──────────────────▶│ HostsEngine  │◀── hosts.base (optional)
//! └─────────────────┘                   └──────────────┘
//!                                              │
//!                          classify ─▶ render ─▶ assemble
//!                                              │
//!                                              ▼
//!                                     ┌────────────────┐
//!                                     │ HostsPublisher │
//!                                     └────────────────┘
//! ```
//!
//! ## Failure Flow
//!
//! Inventory and publish errors are returned unchanged. Nothing is published
//! when the inventory fails, and nothing is retried.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::assemble::{assemble_with_stats, load_base, Assembly, AssemblyStats};
use crate::config::HostsConfig;
use crate::error::Result;
use crate::traits::{HostsPublisher, InventorySource};

/// Summary of one completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// What the assembler wrote
    pub stats: AssemblyStats,
    /// Size of the published content
    pub bytes: usize,
    /// Where the content went
    pub destination: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }
}

/// Single-shot hosts pipeline
///
/// ## Lifecycle
///
/// 1. Create with [`HostsEngine::new()`]
/// 2. Call [`HostsEngine::run()`] once per invocation
/// 3. Drop
pub struct HostsEngine {
    /// Inventory to render
    inventory: Box<dyn InventorySource>,

    /// Destination of the rendered content
    publisher: Box<dyn HostsPublisher>,

    /// Domains, LAN prefix, private-range table
    hosts: HostsConfig,

    /// Optional base template
    base_path: Option<PathBuf>,
}

impl HostsEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `inventory`: Inventory source implementation
    /// - `publisher`: Publisher implementation
    /// - `hosts`: Rendering configuration (validated here)
    pub fn new(
        inventory: Box<dyn InventorySource>,
        publisher: Box<dyn HostsPublisher>,
        hosts: HostsConfig,
    ) -> Result<Self> {
        hosts.validate()?;

        Ok(Self {
            inventory,
            publisher,
            hosts,
            base_path: None,
        })
    }

    /// Prepend the content of `path` (when it exists) to every run
    pub fn with_base_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.base_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Fetch the inventory and assemble the content without publishing it
    pub async fn assemble(&self) -> Result<Assembly> {
        debug!("Fetching inventory from {}", self.inventory.source_name());
        let instances = self.inventory.instances().await?;
        info!(
            "Fetched {} instance(s) from {}",
            instances.len(),
            self.inventory.source_name()
        );

        let base = match &self.base_path {
            Some(path) => load_base(path).await,
            None => None,
        };

        Ok(assemble_with_stats(&instances, &self.hosts, base.as_deref()))
    }

    /// Run the pipeline once
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: Content assembled and published
    /// - `Err(Error)`: Inventory or publish failure, unchanged
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();

        let assembly = self.assemble().await?;
        self.publisher.publish(&assembly.content).await?;

        let report = RunReport {
            stats: assembly.stats,
            bytes: assembly.content.len(),
            destination: self.publisher.destination(),
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Complete! {} line(s) from {} instance(s) ({} skipped), {} bytes to {}",
            report.stats.lines,
            report.stats.instances,
            report.stats.skipped,
            report.bytes,
            report.destination
        );

        Ok(report)
    }
}

//! Test doubles and common utilities for contract tests
//!
//! This module provides minimal test doubles that verify pipeline
//! contracts without talking to a real cloud.

#![allow(dead_code)]

use hostsync_core::error::{Error, Result};
use hostsync_core::traits::{HostsPublisher, Instance, InventorySource};
use hostsync_core::HostsConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An inventory that counts how often it was queried
pub struct CountingInventory {
    instances: Vec<Instance>,
    calls: Arc<AtomicUsize>,
}

impl CountingInventory {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            instances,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a second handle sharing the call counter
    pub fn sharing_counter_with(other: &Self) -> Self {
        Self {
            instances: other.instances.clone(),
            calls: Arc::clone(&other.calls),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InventorySource for CountingInventory {
    async fn instances(&self) -> Result<Vec<Instance>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.instances.clone())
    }

    fn source_name(&self) -> &'static str {
        "counting"
    }
}

/// An inventory that always fails with an authentication error
pub struct FailingInventory;

#[async_trait::async_trait]
impl InventorySource for FailingInventory {
    async fn instances(&self) -> Result<Vec<Instance>> {
        Err(Error::auth("invalid credentials"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// A publisher that always fails
pub struct FailingPublisher;

#[async_trait::async_trait]
impl HostsPublisher for FailingPublisher {
    async fn publish(&self, _content: &[u8]) -> Result<()> {
        Err(Error::publish("disk full"))
    }

    fn destination(&self) -> String {
        "<failing>".to_string()
    }
}

/// Rendering config used across contract tests
pub fn example_config() -> HostsConfig {
    HostsConfig::new("example.com", "internal.example.com")
}

/// A small mixed inventory: public+private, private-only, unnamed, bare
pub fn sample_inventory() -> Vec<Instance> {
    vec![
        Instance::new("id-web1", "web1")
            .with_interface("public", ["10.0.0.5"])
            .with_interface("ext", ["203.0.113.9"]),
        Instance::new("id-db2", "db2.cluster1").with_interface("lan", ["192.168.1.4"]),
        Instance::new("id-building", "").with_interface("ext", ["198.51.100.7"]),
        Instance::new("id-bare", "bare"),
    ]
}

/// Convert assembled bytes to lines for readable assertions
pub fn lines(content: &[u8]) -> Vec<String> {
    String::from_utf8(content.to_vec())
        .expect("hosts content is UTF-8 in tests")
        .lines()
        .map(str::to_string)
        .collect()
}

//! Hosts file assembly
//!
//! Walks the inventory once, in order, and builds the complete hosts-file
//! content: the optional base template first, then every rendered line.
//!
//! ```text
//! <base template bytes, verbatim>
//! \n
//! 203.0.113.9\t\tweb1.example.com\n
//! 10.0.0.5\t\tweb1.internal.example.com\n
//! ...
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::HostsConfig;
use crate::render::render;
use crate::traits::Instance;

/// Counters collected while assembling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Instances received from the inventory
    pub instances: usize,
    /// Instances skipped because they have no name
    pub skipped: usize,
    /// Hosts lines written (base template excluded)
    pub lines: usize,
}

/// Assembled content plus counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub content: Vec<u8>,
    pub stats: AssemblyStats,
}

/// Assemble the hosts-file content
pub fn assemble(instances: &[Instance], config: &HostsConfig, base: Option<&[u8]>) -> Vec<u8> {
    assemble_with_stats(instances, config, base).content
}

/// Assemble the hosts-file content and report what was written
pub fn assemble_with_stats(
    instances: &[Instance],
    config: &HostsConfig,
    base: Option<&[u8]>,
) -> Assembly {
    let mut content = Vec::new();
    let mut stats = AssemblyStats {
        instances: instances.len(),
        ..AssemblyStats::default()
    };

    if let Some(base) = base {
        content.extend_from_slice(base);
        content.push(b'\n');
    }

    let lan_prefix = config.effective_lan_prefix();
    for instance in instances {
        if !instance.is_named() {
            info!("skip: [{}]", instance.id);
            stats.skipped += 1;
            continue;
        }
        info!("name: {}", instance.name);

        let classification = classify(&instance.interfaces, lan_prefix, &config.private_prefixes);
        if classification.is_empty() {
            debug!("No classifiable address for {}", instance.name);
        }

        for line in render(instance, &classification, config) {
            content.extend_from_slice(format!("{line}\n").as_bytes());
            stats.lines += 1;
        }
    }

    Assembly { content, stats }
}

/// Read the optional base template
///
/// A missing file is the normal case and yields `None`. Any other read
/// failure is logged and also yields `None`: the base is a convenience,
/// not a requirement.
pub async fn load_base(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(data) => {
            debug!("Loaded base template {} ({} bytes)", path.display(), data.len());
            Some(data)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No base template at {}", path.display());
            None
        }
        Err(e) => {
            warn!("Ignoring unreadable base template {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HostsConfig {
        HostsConfig::new("example.com", "internal.example.com")
    }

    #[test]
    fn test_base_then_lines() {
        let instances = vec![Instance::new("1", "web1").with_interface("ext", ["203.0.113.9"])];
        let out = assemble(&instances, &config(), Some(&b"127.0.0.1\tlocalhost"[..]));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "127.0.0.1\tlocalhost\n203.0.113.9\t\tweb1.example.com\n"
        );
    }

    #[test]
    fn test_no_base() {
        let instances = vec![Instance::new("1", "db").with_interface("lan", ["10.0.0.1"])];
        let out = assemble(&instances, &config(), None);
        assert_eq!(out, b"10.0.0.1\t\tdb.internal.example.com\n".to_vec());
    }

    #[test]
    fn test_every_line_is_newline_terminated() {
        let instances = vec![
            Instance::new("1", "web1")
                .with_interface("lan", ["10.0.0.5"])
                .with_interface("ext", ["203.0.113.9"]),
            Instance::new("2", "db").with_interface("lan", ["10.0.0.6"]),
        ];
        let assembly = assemble_with_stats(&instances, &config(), None);

        assert_eq!(
            String::from_utf8(assembly.content.clone()).unwrap(),
            "203.0.113.9\t\tweb1.example.com\n\
             10.0.0.5\t\tweb1.internal.example.com\n\
             10.0.0.6\t\tdb.internal.example.com\n"
        );
        let newlines = assembly.content.iter().filter(|b| **b == b'\n').count();
        assert_eq!(newlines, assembly.stats.lines);
    }

    #[test]
    fn test_empty_base_still_gets_separator() {
        let out = assemble(&[], &config(), Some(&b""[..]));
        assert_eq!(out, b"\n".to_vec());
    }

    #[test]
    fn test_stats() {
        let instances = vec![
            Instance::new("1", "web1")
                .with_interface("lan", ["10.0.0.5"])
                .with_interface("ext", ["203.0.113.9"]),
            Instance::new("2", "").with_interface("ext", ["198.51.100.1"]),
            Instance::new("3", "bare"),
        ];
        let assembly = assemble_with_stats(&instances, &config(), None);
        assert_eq!(
            assembly.stats,
            AssemblyStats {
                instances: 3,
                skipped: 1,
                lines: 2
            }
        );
    }

    #[tokio::test]
    async fn test_load_base_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_base(&dir.path().join("hosts.base")).await, None);
    }

    #[tokio::test]
    async fn test_load_base_reads_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.base");
        tokio::fs::write(&path, b"# managed\n\xff raw").await.unwrap();
        assert_eq!(load_base(&path).await, Some(b"# managed\n\xff raw".to_vec()));
    }

    #[tokio::test]
    async fn test_load_base_directory_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_base(dir.path()).await, None);
    }
}

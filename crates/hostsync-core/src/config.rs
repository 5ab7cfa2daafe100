//! Configuration types for hostsync
//!
//! This module defines all configuration structures used throughout the crate,
//! and the TOML file format they are loaded from:
//!
//! ```toml
//! [default]
//! os_username = "admin"
//! os_password = "secret"
//! os_tenant_name = "infra"
//! os_auth_url = "https://keystone.example.com:5000/v3"
//! os_region = "RegionOne"
//!
//! domain = "example.com"
//! internal_domain = "internal.example.com"
//! lan_prefix = "10.1."
//! use_short_hostname = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::classify::PrefixTable;
use crate::Error;

/// Default compute region when the config file does not name one
pub const DEFAULT_REGION: &str = "RegionOne";

/// Default permission bits of a published hosts file
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Rendering configuration consumed by the classifier, renderer and assembler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsConfig {
    /// Domain suffix for WAN lines
    pub external_domain: String,

    /// Domain suffix for LAN lines
    pub internal_domain: String,

    /// Operator-specified LAN prefix; empty or absent means "use the private-range table"
    pub lan_prefix: Option<String>,

    /// Strip the instance name at its first `.`
    pub use_short_hostname: bool,

    /// Textual prefixes that mark an address as private
    pub private_prefixes: PrefixTable,
}

impl HostsConfig {
    /// Create a rendering configuration with the built-in private-range table
    pub fn new(external_domain: impl Into<String>, internal_domain: impl Into<String>) -> Self {
        Self {
            external_domain: external_domain.into(),
            internal_domain: internal_domain.into(),
            lan_prefix: None,
            use_short_hostname: false,
            private_prefixes: PrefixTable::default(),
        }
    }

    /// Set the LAN prefix
    pub fn with_lan_prefix(mut self, lan_prefix: impl Into<String>) -> Self {
        self.lan_prefix = Some(lan_prefix.into());
        self
    }

    /// Enable or disable short hostnames
    pub fn with_short_hostname(mut self, enabled: bool) -> Self {
        self.use_short_hostname = enabled;
        self
    }

    /// Replace the private-range table
    pub fn with_private_prefixes(mut self, table: PrefixTable) -> Self {
        self.private_prefixes = table;
        self
    }

    /// LAN prefix to match against, if one is set and non-empty
    pub fn effective_lan_prefix(&self) -> Option<&str> {
        self.lan_prefix.as_deref().filter(|p| !p.is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Error> {
        if self.external_domain.is_empty() {
            return Err(Error::config("domain cannot be empty"));
        }
        if self.internal_domain.is_empty() {
            return Err(Error::config("internal_domain cannot be empty"));
        }
        if self.private_prefixes.is_empty() {
            return Err(Error::config("private_prefixes cannot be empty"));
        }
        Ok(())
    }
}

/// Cloud credentials for the inventory source
#[derive(Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub username: String,
    /// ⚠️ NEVER log this value
    pub password: String,
    pub tenant_name: String,
    pub auth_url: String,
    pub region: String,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConfig")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("tenant_name", &self.tenant_name)
            .field("auth_url", &self.auth_url)
            .field("region", &self.region)
            .finish()
    }
}

impl CloudConfig {
    /// Validate the cloud configuration
    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("os_username", &self.username),
            ("os_password", &self.password),
            ("os_tenant_name", &self.tenant_name),
            ("os_auth_url", &self.auth_url),
            ("os_region", &self.region),
        ];
        for (key, value) in required {
            if value.is_empty() {
                return Err(Error::config(format!("{} cannot be empty", key)));
            }
        }

        if !self.auth_url.starts_with("https://") && !self.auth_url.starts_with("http://") {
            return Err(Error::config(format!(
                "os_auth_url must use HTTP or HTTPS scheme. Got: {}",
                self.auth_url
            )));
        }

        Ok(())
    }
}

/// Where the assembled hosts content goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    /// Standard output (not a durable artifact)
    #[default]
    Stdout,

    /// Atomically replaced file
    File {
        /// Path of the hosts file to replace
        path: PathBuf,
    },
}

/// Output configuration, assembled by the binary from its flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Publish destination
    pub destination: Destination,

    /// Optional base template copied verbatim ahead of the rendered lines
    pub base_path: Option<PathBuf>,

    /// Directory for the temporary file of an atomic publish
    pub scratch_dir: PathBuf,

    /// Permission bits of the published file
    pub file_mode: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: Destination::default(),
            base_path: None,
            scratch_dir: std::env::temp_dir(),
            file_mode: DEFAULT_FILE_MODE,
        }
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// On-disk configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// The `[default]` table
    pub default: ConfigSection,
}

/// Keys of the `[default]` table
#[derive(Clone, Deserialize)]
pub struct ConfigSection {
    pub os_username: String,
    pub os_password: String,
    pub os_tenant_name: String,
    pub os_auth_url: String,
    #[serde(default = "default_region")]
    pub os_region: String,

    pub domain: String,
    pub internal_domain: String,
    #[serde(default)]
    pub lan_prefix: Option<String>,
    #[serde(default)]
    pub use_short_hostname: bool,
    #[serde(default)]
    pub private_prefixes: Option<Vec<String>>,
}

impl std::fmt::Debug for ConfigSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSection")
            .field("os_username", &self.os_username)
            .field("os_password", &"<REDACTED>")
            .field("os_tenant_name", &self.os_tenant_name)
            .field("os_auth_url", &self.os_auth_url)
            .field("os_region", &self.os_region)
            .field("domain", &self.domain)
            .field("internal_domain", &self.internal_domain)
            .field("lan_prefix", &self.lan_prefix)
            .field("use_short_hostname", &self.use_short_hostname)
            .field("private_prefixes", &self.private_prefixes)
            .finish()
    }
}

impl ConfigFile {
    /// Load and parse a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))
    }

    /// Cloud credentials
    pub fn cloud(&self) -> CloudConfig {
        let s = &self.default;
        CloudConfig {
            username: s.os_username.clone(),
            password: s.os_password.clone(),
            tenant_name: s.os_tenant_name.clone(),
            auth_url: s.os_auth_url.clone(),
            region: s.os_region.clone(),
        }
    }

    /// Rendering configuration
    pub fn hosts(&self) -> HostsConfig {
        let s = &self.default;
        let table = s
            .private_prefixes
            .clone()
            .map(PrefixTable::new)
            .unwrap_or_default();

        HostsConfig {
            external_domain: s.domain.clone(),
            internal_domain: s.internal_domain.clone(),
            lan_prefix: s.lan_prefix.clone(),
            use_short_hostname: s.use_short_hostname,
            private_prefixes: table,
        }
    }

    /// Validate both halves of the configuration
    pub fn validate(&self) -> Result<(), Error> {
        self.cloud().validate()?;
        self.hosts().validate()?;
        Ok(())
    }
}

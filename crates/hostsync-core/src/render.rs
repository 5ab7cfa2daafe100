//! Record rendering
//!
//! Turns a classified instance into zero, one or two hosts-file lines.

use std::fmt;

use crate::classify::Classification;
use crate::config::HostsConfig;
use crate::traits::Instance;

/// One `ip<TAB><TAB>fqdn` line of the hosts file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub ip: String,
    pub fqdn: String,
}

impl RenderedLine {
    pub fn new(ip: impl Into<String>, fqdn: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            fqdn: fqdn.into(),
        }
    }
}

/// Serialized form without the trailing newline
impl fmt::Display for RenderedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t\t{}", self.ip, self.fqdn)
    }
}

/// Name used as the host label: the full name, or the part before the first `.`
pub fn display_name(name: &str, short: bool) -> &str {
    if short {
        name.split('.').next().unwrap_or(name)
    } else {
        name
    }
}

/// Render the lines for one instance, WAN before LAN
///
/// Callers filter out unnamed instances beforehand.
pub fn render(
    instance: &Instance,
    classification: &Classification,
    config: &HostsConfig,
) -> Vec<RenderedLine> {
    let host = display_name(&instance.name, config.use_short_hostname);
    let mut lines = Vec::with_capacity(2);

    if let Some(wan) = &classification.wan {
        lines.push(RenderedLine::new(
            wan.as_str(),
            format!("{}.{}", host, config.external_domain),
        ));
    }
    if let Some(lan) = &classification.lan {
        lines.push(RenderedLine::new(
            lan.as_str(),
            format!("{}.{}", host, config.internal_domain),
        ));
    }

    lines
}

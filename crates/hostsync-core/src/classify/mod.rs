//! Address classification
//!
//! Decides, for one instance, which address (if any) faces the WAN and which
//! (if any) faces the LAN.
//!
//! ## Rules
//!
//! 1. Only the first address of each interface is considered ([`first_address`])
//! 2. WAN: the first address that matches no prefix of the private-range table
//! 3. LAN: the first address starting with the operator's LAN prefix, or, when
//!    none is set, the first address matching the private-range table
//!
//! Matching is textual. `172.160.0.1` starts with `172.16` but not with
//! `172.16.`, while `172.16.x` through `172.31.x` are each listed explicitly.
//! Interfaces are walked in the order the inventory supplied them; when more
//! than one interface qualifies, which one wins is not part of the contract.

use crate::traits::{Address, NetworkInterface};

/// Built-in private-range prefixes (RFC 1918), in match order
pub const PRIVATE_IP_PREFIXES: &[&str] = &[
    "10.", "172.16.", "172.17.", "172.18.", "172.19.", "172.20.", "172.21.", "172.22.", "172.23.",
    "172.24.", "172.25.", "172.26.", "172.27.", "172.28.", "172.29.", "172.30.", "172.31.",
    "192.168.",
];

/// Ordered list of textual address prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable(Vec<String>);

impl PrefixTable {
    /// Create a table from arbitrary prefixes
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(prefixes.into_iter().map(Into::into).collect())
    }

    /// The built-in private-range table
    pub fn private_ranges() -> Self {
        Self::new(PRIVATE_IP_PREFIXES.iter().copied())
    }

    /// Whether `ip` starts with any prefix of the table
    pub fn matches(&self, ip: &str) -> bool {
        self.0.iter().any(|prefix| ip.starts_with(prefix.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::private_ranges()
    }
}

/// Result of classifying one instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// WAN-facing address, if any
    pub wan: Option<String>,
    /// LAN-facing address, if any
    pub lan: Option<String>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.wan.is_none() && self.lan.is_none()
    }
}

/// First address of an interface, or `None` when it has no addresses
pub fn first_address(interface: &NetworkInterface) -> Option<&Address> {
    interface.addresses.first()
}

/// Iterate the candidate address of each interface, skipping empty ones
fn candidates(interfaces: &[NetworkInterface]) -> impl Iterator<Item = &str> {
    interfaces
        .iter()
        .filter_map(first_address)
        .map(|addr| addr.ip.as_str())
}

/// Pick the WAN-facing address
pub fn classify_wan(interfaces: &[NetworkInterface], private: &PrefixTable) -> Option<String> {
    candidates(interfaces)
        .find(|ip| !private.matches(ip))
        .map(str::to_string)
}

/// Pick the LAN-facing address
///
/// A non-empty `lan_prefix` replaces the private-range table entirely.
pub fn classify_lan(
    interfaces: &[NetworkInterface],
    lan_prefix: Option<&str>,
    private: &PrefixTable,
) -> Option<String> {
    let found = match lan_prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => candidates(interfaces).find(|ip| ip.starts_with(prefix)),
        None => candidates(interfaces).find(|ip| private.matches(ip)),
    };
    found.map(str::to_string)
}

/// Classify both categories at once
pub fn classify(
    interfaces: &[NetworkInterface],
    lan_prefix: Option<&str>,
    private: &PrefixTable,
) -> Classification {
    Classification {
        wan: classify_wan(interfaces, private),
        lan: classify_lan(interfaces, lan_prefix, private),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(name: &str, ips: &[&str]) -> NetworkInterface {
        NetworkInterface::new(name, ips.iter().copied())
    }

    #[test]
    fn test_builtin_table() {
        let table = PrefixTable::private_ranges();
        assert_eq!(table.len(), 18);
        assert!(table.matches("10.0.0.1"));
        assert!(table.matches("172.16.0.1"));
        assert!(table.matches("172.31.255.255"));
        assert!(table.matches("192.168.1.1"));
        assert!(!table.matches("172.15.0.1"));
        assert!(!table.matches("172.32.0.1"));
        assert!(!table.matches("203.0.113.9"));
    }

    #[test]
    fn test_textual_match_is_kept() {
        // "100.x" does not start with "10." even though it starts with "10"
        let table = PrefixTable::private_ranges();
        assert!(!table.matches("100.64.0.1"));
        assert!(!table.matches("172.160.0.1"));
        assert!(table.matches("10.999.0.1"));
    }

    #[test]
    fn test_first_address_narrowing() {
        let empty = iface("empty", &[]);
        assert_eq!(first_address(&empty), None);

        let multi = iface("multi", &["10.0.0.1", "203.0.113.1"]);
        assert_eq!(first_address(&multi), Some(&Address::new("10.0.0.1")));
    }

    #[test]
    fn test_wan_prefers_public_sibling() {
        let table = PrefixTable::private_ranges();
        let ifaces = vec![iface("lan", &["10.0.0.5"]), iface("ext", &["203.0.113.9"])];
        assert_eq!(classify_wan(&ifaces, &table), Some("203.0.113.9".to_string()));
    }

    #[test]
    fn test_wan_ignores_secondary_addresses() {
        let table = PrefixTable::private_ranges();
        let ifaces = vec![iface("lan", &["10.0.0.5", "203.0.113.9"])];
        assert_eq!(classify_wan(&ifaces, &table), None);
    }

    #[test]
    fn test_empty_interfaces_are_skipped() {
        let table = PrefixTable::private_ranges();
        let ifaces = vec![iface("none", &[]), iface("lan", &["192.168.1.4"])];
        assert_eq!(classify_wan(&ifaces, &table), None);
        assert_eq!(classify_lan(&ifaces, None, &table), Some("192.168.1.4".to_string()));
        assert!(classify(&[], None, &table).is_empty());
    }

    #[test]
    fn test_lan_explicit_prefix_ignores_table() {
        let table = PrefixTable::private_ranges();
        let ifaces = vec![
            iface("a", &["10.0.0.5"]),
            iface("b", &["203.0.113.9"]),
            iface("c", &["100.64.3.3"]),
        ];
        assert_eq!(classify_lan(&ifaces, Some("100.64."), &table), Some("100.64.3.3".to_string()));
        assert_eq!(classify_lan(&ifaces, Some("172."), &table), None);
    }

    #[test]
    fn test_lan_empty_prefix_falls_back_to_table() {
        let table = PrefixTable::private_ranges();
        let ifaces = vec![
            iface("ext", &["203.0.113.9"]),
            iface("a", &["172.20.0.1"]),
            iface("b", &["10.0.0.5"]),
        ];
        assert_eq!(classify_lan(&ifaces, Some(""), &table), Some("172.20.0.1".to_string()));
        assert_eq!(classify_lan(&ifaces, None, &table), Some("172.20.0.1".to_string()));
    }

    #[test]
    fn test_custom_table() {
        let table = PrefixTable::new(["100.64."]);
        let ifaces = vec![iface("a", &["10.0.0.5"]), iface("b", &["100.64.0.2"])];
        let result = classify(&ifaces, None, &table);
        assert_eq!(result.wan, Some("10.0.0.5".to_string()));
        assert_eq!(result.lan, Some("100.64.0.2".to_string()));
    }
}

// # OpenStack Inventory Source
//
// This crate provides an InventorySource backed by the OpenStack Identity
// (Keystone) and Compute (Nova) APIs.
//
// ## Flow
//
// 1. Authenticate against Keystone with username/password/tenant
// 2. Pick the public compute endpoint of the configured region from the
//    service catalog
// 3. List ACTIVE servers, following `servers_links` pagination
// 4. Map each server's `addresses` to instance interfaces
//
// ## Architectural Constraints
//
// - One authentication and one listing pass per `instances()` call
// - NO retry logic: every failure is returned to the caller as-is
// - NO caching of tokens between calls
//
// ## Security Requirements
//
// - The password and the issued token NEVER appear in logs
// - `Debug` output redacts the password
//
// ## API Reference
//
// - Identity v3: POST `/v3/auth/tokens` (token in `X-Subject-Token`)
// - Identity v2: POST `/v2.0/tokens` (token in `access.token.id`)
// - Compute: GET `/servers/detail?status=ACTIVE`

use async_trait::async_trait;
use hostsync_core::config::CloudConfig;
use hostsync_core::traits::{Address, Instance, InventorySource, NetworkInterface};
use hostsync_core::{Error, Result};
use serde_json::{json, Value};
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider name used in errors and logs
const PROVIDER: &str = "openstack";

/// Keystone API flavour, chosen from the auth URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityVersion {
    V2,
    V3,
}

impl IdentityVersion {
    /// Detect the identity version and build the token URL
    ///
    /// - `.../v2.0` → v2, `POST .../v2.0/tokens`
    /// - `.../v3` → v3, `POST .../v3/auth/tokens`
    /// - anything else → v3, `POST .../v3/auth/tokens`
    pub fn detect(auth_url: &str) -> (Self, String) {
        let base = auth_url.trim_end_matches('/');
        if base.ends_with("/v2.0") {
            (Self::V2, format!("{}/tokens", base))
        } else if base.ends_with("/v3") {
            (Self::V3, format!("{}/auth/tokens", base))
        } else {
            (Self::V3, format!("{}/v3/auth/tokens", base))
        }
    }
}

/// Authenticated session: a token plus the compute endpoint it is valid for
struct Session {
    token: String,
    compute_url: String,
}

/// OpenStack compute inventory
///
/// Lists every ACTIVE server visible to the configured tenant.
pub struct OpenStackInventory {
    /// Credentials and region
    /// ⚠️ Contains the password: NEVER log this value
    config: CloudConfig,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for OpenStackInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenStackInventory")
            .field("config", &self.config)
            .finish()
    }
}

impl OpenStackInventory {
    /// Create a new OpenStack inventory source
    ///
    /// Fails fast on an invalid configuration.
    pub fn new(config: CloudConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Authenticate and resolve the compute endpoint
    async fn authenticate(&self) -> Result<Session> {
        let (version, token_url) = IdentityVersion::detect(&self.config.auth_url);
        tracing::debug!("Authenticating against {} ({:?})", token_url, version);

        let body = match version {
            IdentityVersion::V2 => v2_auth_body(&self.config),
            IdentityVersion::V3 => v3_auth_body(&self.config),
        };

        let response = self
            .client
            .post(&token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(status_error(response, "Authentication").await);
        }

        let header_token = response
            .headers()
            .get("X-Subject-Token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to parse response: {}", e)))?;

        let (token, compute_url) = match version {
            IdentityVersion::V2 => {
                let token = json["access"]["token"]["id"]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        Error::provider(
                            PROVIDER,
                            "Invalid response format: access.token.id missing",
                        )
                    })?;
                (token, compute_endpoint_v2(&json, &self.config.region)?)
            }
            IdentityVersion::V3 => {
                let token = header_token.ok_or_else(|| {
                    Error::provider(PROVIDER, "Invalid response: X-Subject-Token header missing")
                })?;
                (token, compute_endpoint_v3(&json, &self.config.region)?)
            }
        };

        tracing::debug!("Using compute endpoint {}", compute_url);
        Ok(Session { token, compute_url })
    }

    /// List ACTIVE servers, following pagination links
    async fn list_servers(&self, session: &Session) -> Result<Vec<Instance>> {
        let mut instances = Vec::new();
        let mut next = Some(format!("{}/servers/detail?status=ACTIVE", session.compute_url));

        while let Some(url) = next.take() {
            tracing::debug!("Listing servers: {}", url);

            let response = self
                .client
                .get(&url)
                .header("X-Auth-Token", &session.token)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(status_error(response, "Server listing").await);
            }

            let json: Value = response.json().await.map_err(|e| {
                Error::provider(PROVIDER, format!("Failed to parse response: {}", e))
            })?;

            let (page, next_url) = parse_servers_page(&json)?;
            instances.extend(page);
            next = next_url;
        }

        Ok(instances)
    }
}

#[async_trait]
impl InventorySource for OpenStackInventory {
    async fn instances(&self) -> Result<Vec<Instance>> {
        let session = self.authenticate().await?;
        let instances = self.list_servers(&session).await?;
        tracing::debug!("OpenStack returned {} active server(s)", instances.len());
        Ok(instances)
    }

    fn source_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Map a non-success response to an error
async fn status_error(response: reqwest::Response, what: &str) -> Error {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{} rejected: invalid credentials or insufficient permissions. Status: {}",
            what, status
        )),
        _ => Error::provider(
            PROVIDER,
            format!("{} failed: {} - {}", what, status, error_text),
        ),
    }
}

/// Keystone v2 password request
fn v2_auth_body(config: &CloudConfig) -> Value {
    json!({
        "auth": {
            "tenantName": config.tenant_name,
            "passwordCredentials": {
                "username": config.username,
                "password": config.password,
            }
        }
    })
}

/// Keystone v3 password request, user and project in the default domain
fn v3_auth_body(config: &CloudConfig) -> Value {
    json!({
        "auth": {
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": config.username,
                        "domain": { "id": "default" },
                        "password": config.password,
                    }
                }
            },
            "scope": {
                "project": {
                    "name": config.tenant_name,
                    "domain": { "id": "default" },
                }
            }
        }
    })
}

/// Compute services of a catalog array
fn compute_services(catalog: &Value) -> Result<impl Iterator<Item = &Value>> {
    let services = catalog.as_array().ok_or_else(|| {
        Error::provider(PROVIDER, "Invalid response format: catalog is not an array")
    })?;
    Ok(services.iter().filter(|s| s["type"] == "compute"))
}

fn no_endpoint(region: &str) -> Error {
    Error::inventory(format!(
        "No public compute endpoint for region {} in service catalog",
        region
    ))
}

/// Public compute URL from a v2 `access.serviceCatalog`
fn compute_endpoint_v2(body: &Value, region: &str) -> Result<String> {
    compute_services(&body["access"]["serviceCatalog"])?
        .flat_map(|service| service["endpoints"].as_array().into_iter().flatten())
        .find(|endpoint| endpoint["region"] == region)
        .and_then(|endpoint| endpoint["publicURL"].as_str())
        .map(|url| url.trim_end_matches('/').to_string())
        .ok_or_else(|| no_endpoint(region))
}

/// Public compute URL from a v3 `token.catalog`
fn compute_endpoint_v3(body: &Value, region: &str) -> Result<String> {
    compute_services(&body["token"]["catalog"])?
        .flat_map(|service| service["endpoints"].as_array().into_iter().flatten())
        .find(|endpoint| {
            endpoint["interface"] == "public"
                && (endpoint["region_id"] == region || endpoint["region"] == region)
        })
        .and_then(|endpoint| endpoint["url"].as_str())
        .map(|url| url.trim_end_matches('/').to_string())
        .ok_or_else(|| no_endpoint(region))
}

/// Parse one `servers/detail` page into instances and the next page URL
fn parse_servers_page(body: &Value) -> Result<(Vec<Instance>, Option<String>)> {
    let servers = body["servers"].as_array().ok_or_else(|| {
        Error::provider(PROVIDER, "Invalid response format: servers is not an array")
    })?;

    let instances = servers.iter().map(parse_server).collect::<Result<Vec<_>>>()?;

    let next = body["servers_links"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|link| link["rel"] == "next")
        .and_then(|link| link["href"].as_str())
        .map(str::to_string);

    Ok((instances, next))
}

/// Map a single server object
fn parse_server(server: &Value) -> Result<Instance> {
    let id = server["id"].as_str().ok_or_else(|| {
        Error::provider(PROVIDER, "Invalid response format: server.id is not a string")
    })?;
    // A missing or null name is treated like an empty one
    let name = server["name"].as_str().unwrap_or_default();

    let mut interfaces = Vec::new();
    if let Some(networks) = server["addresses"].as_object() {
        for (network, ports) in networks {
            let ports = ports.as_array().ok_or_else(|| {
                Error::provider(
                    PROVIDER,
                    format!("Invalid response format: addresses.{} is not an array", network),
                )
            })?;

            let addresses = ports
                .iter()
                .map(|port| {
                    port["addr"].as_str().map(Address::new).ok_or_else(|| {
                        Error::provider(
                            PROVIDER,
                            format!("Invalid response format: addr missing on {}/{}", id, network),
                        )
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            interfaces.push(NetworkInterface {
                name: network.clone(),
                addresses,
            });
        }
    }

    Ok(Instance {
        id: id.to_string(),
        name: name.to_string(),
        interfaces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud_config(auth_url: &str) -> CloudConfig {
        CloudConfig {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            tenant_name: "infra".to_string(),
            auth_url: auth_url.to_string(),
            region: "RegionOne".to_string(),
        }
    }

    #[test]
    fn test_identity_version_detection() {
        assert_eq!(
            IdentityVersion::detect("https://keystone:5000/v2.0"),
            (IdentityVersion::V2, "https://keystone:5000/v2.0/tokens".to_string())
        );
        assert_eq!(
            IdentityVersion::detect("https://keystone:5000/v3/"),
            (IdentityVersion::V3, "https://keystone:5000/v3/auth/tokens".to_string())
        );
        assert_eq!(
            IdentityVersion::detect("https://keystone:5000"),
            (IdentityVersion::V3, "https://keystone:5000/v3/auth/tokens".to_string())
        );
    }

    #[test]
    fn test_auth_bodies() {
        let config = cloud_config("https://keystone:5000/v3");

        let v2 = v2_auth_body(&config);
        assert_eq!(v2["auth"]["tenantName"], "infra");
        assert_eq!(v2["auth"]["passwordCredentials"]["username"], "admin");

        let v3 = v3_auth_body(&config);
        assert_eq!(v3["auth"]["identity"]["methods"][0], "password");
        assert_eq!(v3["auth"]["identity"]["password"]["user"]["name"], "admin");
        assert_eq!(v3["auth"]["scope"]["project"]["name"], "infra");
    }

    #[test]
    fn test_compute_endpoint_v2() {
        let body = json!({
            "access": {
                "token": { "id": "tok" },
                "serviceCatalog": [
                    {
                        "type": "identity",
                        "endpoints": [{ "region": "RegionOne", "publicURL": "https://keystone" }]
                    },
                    { "type": "compute", "endpoints": [
                        { "region": "RegionTwo", "publicURL": "https://nova-two/v2.1/abc" },
                        { "region": "RegionOne", "publicURL": "https://nova-one/v2.1/abc/" }
                    ]}
                ]
            }
        });

        assert_eq!(compute_endpoint_v2(&body, "RegionOne").unwrap(), "https://nova-one/v2.1/abc");
        assert_eq!(compute_endpoint_v2(&body, "RegionTwo").unwrap(), "https://nova-two/v2.1/abc");
        assert!(matches!(
            compute_endpoint_v2(&body, "RegionThree"),
            Err(Error::Inventory(_))
        ));
    }

    #[test]
    fn test_compute_endpoint_v3_requires_public_interface() {
        let body = json!({
            "token": {
                "catalog": [
                    { "type": "compute", "endpoints": [
                        {
                            "interface": "internal",
                            "region_id": "RegionOne",
                            "url": "http://nova-internal"
                        },
                        {
                            "interface": "public",
                            "region_id": "RegionOne",
                            "url": "https://nova-public/v2.1"
                        }
                    ]}
                ]
            }
        });

        assert_eq!(compute_endpoint_v3(&body, "RegionOne").unwrap(), "https://nova-public/v2.1");
    }

    #[test]
    fn test_catalog_must_be_array() {
        let body = json!({ "token": { "catalog": "nope" } });
        assert!(matches!(
            compute_endpoint_v3(&body, "RegionOne"),
            Err(Error::Provider { .. })
        ));
    }

    #[test]
    fn test_parse_servers_page() {
        let body = json!({
            "servers": [
                {
                    "id": "a1",
                    "name": "web1",
                    "addresses": {
                        "ext": [{ "addr": "203.0.113.9", "version": 4 }],
                        "public": [
                            { "addr": "10.0.0.5", "version": 4 },
                            { "addr": "10.0.0.6", "version": 4 }
                        ]
                    }
                },
                { "id": "b2", "name": "", "addresses": {} },
                { "id": "c3", "name": null }
            ],
            "servers_links": [
                {
                    "rel": "next",
                    "href": "https://nova/v2.1/servers/detail?status=ACTIVE&marker=c3"
                }
            ]
        });

        let (instances, next) = parse_servers_page(&body).unwrap();
        assert_eq!(instances.len(), 3);

        let web1 = &instances[0];
        assert_eq!(web1.id, "a1");
        assert_eq!(web1.name, "web1");
        assert_eq!(web1.interfaces.len(), 2);
        let public = web1.interfaces.iter().find(|i| i.name == "public").unwrap();
        assert_eq!(public.addresses, vec![Address::new("10.0.0.5"), Address::new("10.0.0.6")]);

        assert!(!instances[1].is_named());
        assert!(!instances[2].is_named());
        assert!(instances[2].interfaces.is_empty());

        assert_eq!(
            next.as_deref(),
            Some("https://nova/v2.1/servers/detail?status=ACTIVE&marker=c3")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let body = json!({ "servers": [], "servers_links": [{ "rel": "prev", "href": "x" }] });
        let (instances, next) = parse_servers_page(&body).unwrap();
        assert!(instances.is_empty());
        assert_eq!(next, None);
    }

    #[test]
    fn test_malformed_listing_is_an_error() {
        assert!(parse_servers_page(&json!({ "error": "boom" })).is_err());

        let missing_addr = json!({
            "servers": [{ "id": "a1", "name": "web1", "addresses": { "net": [{ "version": 4 }] } }]
        });
        assert!(parse_servers_page(&missing_addr).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = cloud_config("https://keystone:5000/v3");
        config.password.clear();
        assert!(matches!(OpenStackInventory::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let inventory = OpenStackInventory::new(cloud_config("https://keystone:5000/v3")).unwrap();
        let debug = format!("{:?}", inventory);
        assert!(!debug.contains("hunter2"));
        assert_eq!(inventory.source_name(), "openstack");
    }
}

//! Client configuration and address resolution.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use url::Url;

use crate::error::{ElasticError, Result};
use crate::security::SecretString;

/// Address used when neither addresses, a cloud id nor `ELASTICSEARCH_URL` are given.
pub const DEFAULT_ADDRESS: &str = "http://localhost:9200";

/// Environment variable consulted for node addresses (comma-separated).
pub const ADDRESS_ENV: &str = "ELASTICSEARCH_URL";

/// Everything needed to build an [`ElasticClient`](crate::ElasticClient).
///
/// Built once by the caller and handed to the constructor; the client keeps
/// no global state.
#[derive(Debug, Clone, Default)]
pub struct ElasticConfig {
    pub addresses: Vec<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub api_key: Option<SecretString>,
    pub cloud_id: Option<String>,
    /// PEM encoded certificate added as an extra trusted root.
    pub ca_cert: Option<Vec<u8>>,
}

impl ElasticConfig {
    pub fn new(addresses: Vec<String>) -> Self {
        Self {
            addresses,
            ..Default::default()
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::new(password));
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    pub fn with_cloud_id(mut self, cloud_id: impl Into<String>) -> Self {
        self.cloud_id = Some(cloud_id.into());
        self
    }

    pub fn with_ca_cert(mut self, pem: Vec<u8>) -> Self {
        self.ca_cert = Some(pem);
        self
    }

    /// Resolve the node URLs this configuration points at.
    pub fn resolve_addresses(&self) -> Result<Vec<Url>> {
        self.resolve_addresses_with(std::env::var(ADDRESS_ENV).ok())
    }

    /// Same as [`resolve_addresses`](Self::resolve_addresses) with the
    /// environment fallback passed in explicitly.
    pub fn resolve_addresses_with(&self, env_addresses: Option<String>) -> Result<Vec<Url>> {
        let raw: Vec<String> = match (&self.cloud_id, self.addresses.is_empty()) {
            (Some(_), false) => {
                return Err(ElasticError::Config(
                    "both addresses and cloud id are set".into(),
                ))
            }
            (Some(cloud_id), true) => vec![address_from_cloud_id(cloud_id)?],
            (None, false) => self.addresses.clone(),
            (None, true) => match env_addresses.filter(|v| !v.trim().is_empty()) {
                Some(list) => list
                    .split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect(),
                None => vec![DEFAULT_ADDRESS.to_string()],
            },
        };

        raw.iter().map(|a| parse_address(a)).collect()
    }
}

fn parse_address(address: &str) -> Result<Url> {
    let url = Url::parse(address)
        .map_err(|e| ElasticError::Config(format!("invalid address {:?}: {}", address, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ElasticError::Config(format!(
            "unsupported scheme {:?} in address {:?}",
            other, address
        ))),
    }
}

/// Decode an Elastic Cloud id (`name:base64(host$es-uuid$kibana-uuid)`)
/// into the HTTPS address of its Elasticsearch endpoint.
pub fn address_from_cloud_id(cloud_id: &str) -> Result<String> {
    let invalid = || ElasticError::Config(format!("unexpected cloud id format: {:?}", cloud_id));

    let (_, encoded) = cloud_id.split_once(':').ok_or_else(invalid)?;
    if encoded.contains(':') {
        return Err(invalid());
    }

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|e| ElasticError::Config(format!("cloud id is not valid base64: {}", e)))?;
    let decoded = String::from_utf8(decoded).map_err(|_| invalid())?;

    let mut parts = decoded.split('$');
    match (parts.next(), parts.next()) {
        (Some(host), Some(es_uuid)) if !host.is_empty() && !es_uuid.is_empty() => {
            Ok(format!("https://{}.{}", es_uuid, host))
        }
        _ => Err(ElasticError::Config(format!(
            "invalid encoded cloud id value: {:?}",
            decoded
        ))),
    }
}

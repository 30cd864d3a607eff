//! Pure Elasticsearch REST search client.
//!
//! A minimal client for running a single `_search` request against a cluster.
//! It knows nothing about what the caller does with the response; the raw
//! body is handed back untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use elastic_client::{ElasticClient, ElasticConfig};
//!
//! let config = ElasticConfig::new(vec!["http://localhost:9200".into()])
//!     .with_basic_auth("elastic", "changeme");
//! let client = ElasticClient::new(config)?;
//!
//! let body = client.search("logs-*", r#"{"query":{"match_all":{}}}"#.into()).await?;
//! ```

pub mod config;
pub mod error;
pub mod security;

pub use config::{address_from_cloud_id, ElasticConfig, ADDRESS_ENV, DEFAULT_ADDRESS};
pub use error::{ElasticError, Result};
pub use security::SecretString;

use bytes::Bytes;
use reqwest::{header, Certificate, Client};
use url::Url;

/// Elasticsearch client bound to a resolved set of nodes.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    client: Client,
    addresses: Vec<Url>,
    username: Option<String>,
    password: Option<SecretString>,
    api_key: Option<SecretString>,
}

impl ElasticClient {
    /// Build a client from explicit configuration. Performs no network I/O.
    pub fn new(config: ElasticConfig) -> Result<Self> {
        let addresses = config.resolve_addresses()?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(pem) = &config.ca_cert {
            let cert = Certificate::from_pem(pem).map_err(ElasticError::Certificate)?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder
            .build()
            .map_err(|e| ElasticError::Config(format!("failed to create HTTP client: {}", e)))?;

        tracing::debug!(nodes = addresses.len(), "Elasticsearch client initialized");

        Ok(Self {
            client,
            addresses,
            username: config.username,
            password: config.password,
            api_key: config.api_key,
        })
    }

    /// URL of the `_search` endpoint for `index` on the first node.
    pub fn search_url(&self, index: &str) -> Result<Url> {
        let base = self
            .addresses
            .first()
            .ok_or_else(|| ElasticError::Config("no addresses configured".into()))?;
        search_url(base, index)
    }

    /// Run `body` against `index` with total hit tracking enabled and return
    /// the raw response body.
    ///
    /// Only the first configured node is contacted; there is no failover.
    pub async fn search(&self, index: &str, body: String) -> Result<Bytes> {
        let url = self.search_url(index)?;
        tracing::debug!(%url, "Sending search request");

        let mut request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(api_key) = &self.api_key {
            request = request.header(header::AUTHORIZATION, format!("ApiKey {}", api_key.expose()));
        } else if self.username.is_some() || self.password.is_some() {
            let username = self.username.as_deref().unwrap_or_default();
            request = request.basic_auth(username, self.password.as_ref().map(|p| p.expose()));
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ElasticError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.bytes().await?;
        tracing::debug!(bytes = body.len(), "Search response received");
        Ok(body)
    }
}

fn search_url(base: &Url, index: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ElasticError::Config(format!("address cannot be a base URL: {}", base)))?
        .pop_if_empty()
        .push(index)
        .push("_search");
    url.query_pairs_mut().append_pair("track_total_hits", "true");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_appends_index_and_endpoint() {
        let client = ElasticClient::new(ElasticConfig::new(vec!["http://es:9200".into()])).unwrap();
        assert_eq!(
            client.search_url("logs-*").unwrap().as_str(),
            "http://es:9200/logs-*/_search?track_total_hits=true"
        );
    }

    #[test]
    fn search_url_keeps_base_path() {
        let client =
            ElasticClient::new(ElasticConfig::new(vec!["https://proxy/elastic/".into()])).unwrap();
        assert_eq!(
            client.search_url("index").unwrap().as_str(),
            "https://proxy/elastic/index/_search?track_total_hits=true"
        );
    }

    #[test]
    fn debug_output_hides_credentials() {
        let config = ElasticConfig::new(vec!["http://es:9200".into()])
            .with_basic_auth("elastic", "s3cret")
            .with_api_key("key-material");
        let client = ElasticClient::new(config).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("key-material"));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_transport_error() {
        let client = ElasticClient::new(ElasticConfig::new(vec!["http://127.0.0.1:1".into()])).unwrap();
        let err = client.search("index", "{}".into()).await.unwrap_err();
        assert!(matches!(err, ElasticError::Transport(_)));
    }
}

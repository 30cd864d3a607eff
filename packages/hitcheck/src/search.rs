// Search seam for dependency injection
//
// The probe only needs "run this body against this index and hand back the
// raw response". Production uses ElasticClient; tests use MockSearchService.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use elastic_client::ElasticClient;

#[async_trait]
pub trait BaseSearchService: Send + Sync {
    /// Run `body` against `index`, returning the raw response body.
    async fn search(&self, index: &str, body: String) -> Result<Bytes>;
}

#[async_trait]
impl BaseSearchService for ElasticClient {
    async fn search(&self, index: &str, body: String) -> Result<Bytes> {
        Ok(ElasticClient::search(self, index, body).await?)
    }
}

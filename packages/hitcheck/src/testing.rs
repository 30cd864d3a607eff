//! Testing utilities: a search service that never touches the network.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};

use crate::search::BaseSearchService;

/// Arguments captured from a search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub index: String,
    pub body: String,
}

/// Canned-response search service with call recording.
///
/// Clones share state, so a test can keep one handle and give another to the probe.
#[derive(Clone, Default)]
pub struct MockSearchService {
    response: Arc<Mutex<Option<std::result::Result<Bytes, String>>>>,
    calls: Arc<Mutex<Vec<SearchCall>>>,
}

impl MockSearchService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with a well-formed body reporting `hits` total hits.
    pub fn with_hits(self, hits: u64) -> Self {
        let body = format!(
            r#"{{"took":1,"timed_out":false,"hits":{{"total":{{"value":{},"relation":"eq"}},"hits":[]}}}}"#,
            hits
        );
        self.with_body(body)
    }

    /// Respond with an arbitrary raw body.
    pub fn with_body(self, body: impl Into<Bytes>) -> Self {
        *self.response.lock().unwrap() = Some(Ok(body.into()));
        self
    }

    /// Fail every search with `message`.
    pub fn with_error(self, message: &str) -> Self {
        *self.response.lock().unwrap() = Some(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseSearchService for MockSearchService {
    async fn search(&self, index: &str, body: String) -> Result<Bytes> {
        self.calls.lock().unwrap().push(SearchCall {
            index: index.to_string(),
            body,
        });

        match self.response.lock().unwrap().clone() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => anyhow::bail!("MockSearchService: no response configured"),
        }
    }
}

//! Typed projection of the search response: only `hits.total.value` is read.

use serde::Deserialize;

use crate::error::{ProbeError, Result};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: Total,
}

#[derive(Debug, Deserialize)]
struct Total {
    value: u64,
}

/// Extract the total hit count. Missing or non-numeric fields fail closed.
pub fn hit_count(body: &[u8]) -> Result<i64> {
    let response: SearchResponse =
        serde_json::from_slice(body).map_err(|e| ProbeError::Decode(e.to_string()))?;
    let value = response.hits.total.value;
    i64::try_from(value)
        .map_err(|_| ProbeError::Decode(format!("hit count {} out of range", value)))
}

//! One probe run, from event check to verdict.

use std::path::PathBuf;

use crate::accumulator::{accumulate, WriteFailurePolicy};
use crate::counter::CounterStore;
use crate::error::{ProbeError, Result};
use crate::event::{handle_event, EventOutcome};
use crate::query::load_query;
use crate::response::hit_count;
use crate::search::BaseSearchService;
use crate::verdict::{Thresholds, Verdict};

pub const DEFAULT_INDEX: &str = "index";
pub const DEFAULT_LABEL: &str = "hits for elastic search.";

/// Everything a run needs apart from the search client itself.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub query_path: PathBuf,
    pub index: String,
    pub label: String,
    pub counter: Option<CounterStore>,
    pub thresholds: Thresholds,
    pub is_event: bool,
    pub current_status: i32,
    pub write_policy: WriteFailurePolicy,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            query_path: PathBuf::new(),
            index: DEFAULT_INDEX.to_string(),
            label: DEFAULT_LABEL.to_string(),
            counter: None,
            thresholds: Thresholds::default(),
            is_event: false,
            current_status: 0,
            write_policy: WriteFailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Event mode cleared the counter; nothing was queried.
    Reset,
    Verdict(Verdict),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Reset => 0,
            Outcome::Verdict(verdict) => verdict.exit_code(),
        }
    }
}

/// Run the probe.
///
/// `connect` builds the search service and is only called once the event
/// check has passed through, so a reset never needs a reachable cluster.
pub async fn run<S, F>(settings: &ProbeSettings, connect: F) -> Result<Outcome>
where
    S: BaseSearchService,
    F: FnOnce() -> Result<S>,
{
    let store = settings.counter.as_ref();

    if handle_event(settings.is_event, settings.current_status, store) == EventOutcome::Reset {
        return Ok(Outcome::Reset);
    }

    let search = connect()?;
    let body = load_query(&settings.query_path)?;

    tracing::debug!(index = %settings.index, "Executing search");
    let raw = search
        .search(&settings.index, body)
        .await
        .map_err(ProbeError::Search)?;
    let hits = hit_count(&raw)?;

    let acc = accumulate(hits, store, settings.write_policy)?;
    let verdict = Verdict::evaluate(acc.value, settings.thresholds, settings.label.clone());
    tracing::debug!(severity = %verdict.severity, value = verdict.value, "Evaluated");

    Ok(Outcome::Verdict(verdict))
}

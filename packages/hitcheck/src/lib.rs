//! Elasticsearch hit-count probe for Nagios-compatible supervisors.
//!
//! Runs a query, optionally adds the hit count to a running total kept in a
//! counter file, and maps the result onto OK / WARNING / CRITICAL with a
//! performance-data suffix. Event mode clears the running total when the
//! supervisor reports the service healthy again.
//!
//! # Example
//!
//! ```rust,ignore
//! use hitcheck::{probe, ProbeSettings, Thresholds};
//!
//! let settings = ProbeSettings {
//!     query_path: "errors.json".into(),
//!     thresholds: Thresholds::new(10, 20),
//!     ..Default::default()
//! };
//! let outcome = probe::run(&settings, || Ok(client)).await?;
//! ```

pub mod accumulator;
pub mod cli;
pub mod counter;
pub mod error;
pub mod event;
pub mod probe;
pub mod query;
pub mod response;
pub mod search;
pub mod testing;
pub mod verdict;

pub use accumulator::{accumulate, Accumulation, WriteFailurePolicy};
pub use counter::CounterStore;
pub use error::{CounterError, ProbeError, Result};
pub use event::{handle_event, EventOutcome};
pub use probe::{Outcome, ProbeSettings};
pub use search::BaseSearchService;
pub use verdict::{Severity, Thresholds, Verdict};

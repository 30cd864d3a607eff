//! Combines fresh hits with the persisted running total.

use crate::counter::CounterStore;
use crate::error::{CounterError, ProbeError, Result};

/// What to do when the new total cannot be written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteFailurePolicy {
    /// Log and keep going with the in-memory total.
    #[default]
    Warn,
    /// Abort the run as UNKNOWN.
    Fatal,
}

/// Result of one accumulation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulation {
    /// Value handed to the verdict evaluator.
    pub value: i64,
    /// Persisted total read before this run, if any.
    pub prior: Option<i64>,
    /// Whether `value` made it to disk. Always false without a store.
    pub persisted: bool,
}

/// Add `hits` to the stored total (absent counts as zero) and write the sum back.
///
/// Without a store this is the identity and touches no files. With one, the
/// write happens on every call regardless of the later verdict.
pub fn accumulate(
    hits: i64,
    store: Option<&CounterStore>,
    policy: WriteFailurePolicy,
) -> Result<Accumulation> {
    let Some(store) = store else {
        return Ok(Accumulation {
            value: hits,
            prior: None,
            persisted: false,
        });
    };

    let prior = store.load().map_err(ProbeError::CounterRead)?;
    let value = hits
        .checked_add(prior.unwrap_or(0))
        .ok_or_else(|| {
            ProbeError::CounterRead(CounterError::Overflow {
                hits,
                prior: prior.unwrap_or(0),
            })
        })?;

    let persisted = match store.save(value) {
        Ok(()) => true,
        Err(e) if policy == WriteFailurePolicy::Fatal => return Err(ProbeError::CounterWrite(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Counter file not updated; continuing with in-memory total");
            false
        }
    };

    tracing::debug!(hits, ?prior, value, persisted, "Accumulated hit count");

    Ok(Accumulation {
        value,
        prior,
        persisted,
    })
}

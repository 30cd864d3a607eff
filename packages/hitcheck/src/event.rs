//! Event handler mode: a healthy state notification wipes the counter.

use crate::counter::CounterStore;
use crate::verdict::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Counter cleared; the caller exits 0 without probing.
    Reset,
    /// Not a reset; run the normal probe.
    PassThrough,
}

pub fn handle_event(
    is_event: bool,
    current_status: i32,
    store: Option<&CounterStore>,
) -> EventOutcome {
    if !is_event || current_status != Severity::Ok.exit_code() {
        return EventOutcome::PassThrough;
    }

    if let Some(store) = store {
        match store.delete() {
            Ok(()) => tracing::debug!(path = %store.path().display(), "Counter reset"),
            Err(e) => tracing::warn!(error = %e, "Counter reset failed"),
        }
    }

    EventOutcome::Reset
}

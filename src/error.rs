use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure surfaced by [`crate::processing::process_trip`].
///
/// Processing is all-or-nothing for a trip; no partial result is returned.
/// The raw-data pass consumes already-numeric values and has no fallible
/// operation, so only the event-parsing stage can fail today.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProcessError {
    /// An event's raw value was not parseable numeric text.
    #[error("invalid event value {value:?} for channel {channel} at {timestamp}")]
    EventValue {
        channel: String,
        timestamp: DateTime<Utc>,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

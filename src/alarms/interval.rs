use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Where an alarm interval was reconstructed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum IntervalSource {
    /// Not yet attributed; an interval with this source is an incomplete
    /// observation and is never retained in a channel's set.
    #[default]
    Unknown,
    /// Reconstructed from an explicit boundary event in the device log.
    FromEvent,
    /// Inferred from raw readings not covered by any recorded event.
    OutsideEvent,
}

impl IntervalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalSource::Unknown => "Unknown",
            IntervalSource::FromEvent => "From Event",
            IntervalSource::OutsideEvent => "Outside Event",
        }
    }
}

/// Which band edge the channel's value crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum IntervalKind {
    #[default]
    Unknown,
    ExceededMax,
    ExceededMin,
}

impl IntervalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Unknown => "Unknown",
            IntervalKind::ExceededMax => "Exceeded Maximum",
            IntervalKind::ExceededMin => "Exceeded Minimum",
        }
    }
}

/// One closed alarm condition: the span during which a channel's value sat
/// outside its configured band, with the readings observed at both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmInterval {
    pub source: IntervalSource,
    pub kind: IntervalKind,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub started_value: f64,
    pub ended_value: f64,
}

impl AlarmInterval {
    /// Span of the condition. Non-negative for every retained interval.
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }
}

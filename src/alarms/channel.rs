use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::alarms::interval::{AlarmInterval, IntervalKind, IntervalSource};
use crate::models::ChannelSettings;

/// All alarm intervals reconstructed for one channel, together with the
/// alarm band that was configured for it on this trip.
///
/// Event-derived intervals are appended directly (the event pass emits them
/// in time order and non-overlapping); raw-derived intervals go through
/// [`ChannelAlarmSet::accumulate`] so they never re-report time already
/// covered by an interval on record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAlarmSet {
    pub channel: String,
    pub data_type: String,
    pub min: f64,
    pub max: f64,
    intervals: Vec<AlarmInterval>,
}

/// Outcome of relating a candidate against the first existing interval it
/// temporally interacts with.
enum Resolution {
    /// Candidate is fully covered by an interval already on record.
    Covered,
    /// Candidate wholly contains an existing interval; only the time on
    /// either side of it is new.
    Split {
        before: AlarmInterval,
        after: AlarmInterval,
    },
    /// Candidate runs into the start of an existing interval; only the
    /// leading portion is new.
    Leading(AlarmInterval),
    /// Candidate runs past the end of an existing interval; only the
    /// trailing portion is new.
    Trailing(AlarmInterval),
}

impl ChannelAlarmSet {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            data_type: String::new(),
            min: 0.0,
            max: 0.0,
            intervals: Vec::new(),
        }
    }

    /// Copy the alarm band and label over from the trip's settings entry.
    pub fn apply_settings(&mut self, settings: &ChannelSettings) {
        self.data_type = settings.data_type.clone();
        self.min = settings.min;
        self.max = settings.max;
    }

    /// True until a settings entry has been applied. Channels absent from
    /// the trip settings keep the ""/0.0/0.0 defaults.
    pub fn is_unconfigured(&self) -> bool {
        self.data_type.is_empty()
    }

    pub fn intervals(&self) -> &[AlarmInterval] {
        &self.intervals
    }

    /// Append an event-derived interval without overlap reconciliation.
    pub fn push(&mut self, interval: AlarmInterval) {
        self.intervals.push(interval);
    }

    /// Merge a raw-derived candidate into the set.
    ///
    /// Scans existing intervals in order and resolves the candidate against
    /// the first one it temporally interacts with; once a non-disjoint case
    /// fires the scan stops. This relies on the event pass producing
    /// mutually disjoint intervals per channel, which is guaranteed by
    /// construction there and not re-verified here.
    pub fn accumulate(&mut self, candidate: AlarmInterval) {
        // An unknown source marks an incomplete observation; nothing to record.
        if candidate.source == IntervalSource::Unknown {
            return;
        }

        let mut resolution = None;
        for existing in &self.intervals {
            if candidate.ended_at < existing.started_at || candidate.started_at > existing.ended_at
            {
                // No interaction with this one; the candidate may still be good.
                continue;
            }

            if candidate.started_at >= existing.started_at
                && candidate.ended_at <= existing.ended_at
            {
                resolution = Some(Resolution::Covered);
            } else if existing.started_at >= candidate.started_at
                && existing.ended_at <= candidate.ended_at
            {
                // The existing (authoritative) interval stays; the candidate
                // contributes the flanking time the event memory missed.
                resolution = Some(Resolution::Split {
                    before: AlarmInterval {
                        source: candidate.source,
                        kind: candidate.kind,
                        started_at: candidate.started_at,
                        ended_at: existing.started_at,
                        started_value: candidate.started_value,
                        ended_value: existing.started_value,
                    },
                    after: AlarmInterval {
                        source: candidate.source,
                        kind: candidate.kind,
                        started_at: existing.ended_at,
                        ended_at: candidate.ended_at,
                        started_value: existing.ended_value,
                        ended_value: candidate.ended_value,
                    },
                });
            } else if candidate.started_at < existing.started_at
                && candidate.ended_at > existing.started_at
            {
                resolution = Some(Resolution::Leading(AlarmInterval {
                    source: candidate.source,
                    kind: candidate.kind,
                    started_at: candidate.started_at,
                    ended_at: existing.started_at,
                    started_value: candidate.started_value,
                    ended_value: existing.started_value,
                }));
            } else if candidate.started_at < existing.ended_at
                && candidate.ended_at > existing.ended_at
            {
                resolution = Some(Resolution::Trailing(AlarmInterval {
                    source: candidate.source,
                    kind: candidate.kind,
                    started_at: existing.ended_at,
                    ended_at: candidate.ended_at,
                    started_value: existing.ended_value,
                    ended_value: candidate.ended_value,
                }));
            }

            if resolution.is_some() {
                break;
            }
        }

        match resolution {
            None => self.intervals.push(candidate),
            Some(Resolution::Covered) => {}
            Some(Resolution::Split { before, after }) => {
                self.intervals.push(before);
                self.intervals.push(after);
            }
            Some(Resolution::Leading(interval)) | Some(Resolution::Trailing(interval)) => {
                self.intervals.push(interval);
            }
        }
    }

    /// Total time in alarm reconstructed from explicit boundary events.
    pub fn duration_from_events(&self) -> Duration {
        self.total_where(|m| m.source == IntervalSource::FromEvent)
    }

    /// Total time in alarm inferred from raw readings outside any event.
    pub fn duration_outside_events(&self) -> Duration {
        self.total_where(|m| m.source == IntervalSource::OutsideEvent)
    }

    pub fn total_duration(&self) -> Duration {
        self.duration_from_events() + self.duration_outside_events()
    }

    pub fn total_exceeded_max(&self) -> Duration {
        self.total_where(|m| m.kind == IntervalKind::ExceededMax)
    }

    pub fn total_exceeded_min(&self) -> Duration {
        self.total_where(|m| m.kind == IntervalKind::ExceededMin)
    }

    fn total_where(&self, pred: impl Fn(&AlarmInterval) -> bool) -> Duration {
        self.intervals
            .iter()
            .filter(|m| pred(m))
            .map(AlarmInterval::duration)
            .fold(Duration::zero(), |total, d| total + d)
    }
}

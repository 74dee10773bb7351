use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::alarms::{AlarmInterval, IntervalKind, IntervalSource, TripAlarmSet};
use crate::error::ProcessError;
use crate::models::{TripRecord, UploadEvent};

/// The alarm-boundary codes the recorder writes into its event log.
/// Every other code in the log is some unrelated device event and is
/// skipped by the explicit `None` arm below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundaryCode {
    MaxEntered,
    MinEntered,
    MaxCleared,
    MinCleared,
}

impl BoundaryCode {
    fn from_code(code: i32) -> Option<Self> {
        match code {
            6 => Some(BoundaryCode::MaxEntered),
            7 => Some(BoundaryCode::MinEntered),
            8 => Some(BoundaryCode::MaxCleared),
            9 => Some(BoundaryCode::MinCleared),
            _ => None,
        }
    }
}

/// An alarm condition that has been entered but not yet cleared.
struct OpenMeasurement {
    channel: String,
    kind: IntervalKind,
    started_at: DateTime<Utc>,
    started_value: f64,
}

impl OpenMeasurement {
    fn close(self, ended_at: DateTime<Utc>, ended_value: f64) -> AlarmInterval {
        AlarmInterval {
            source: IntervalSource::FromEvent,
            kind: self.kind,
            started_at: self.started_at,
            ended_at,
            started_value: self.started_value,
            ended_value,
        }
    }

    /// Close a measurement that never saw its clearing boundary: data
    /// collection ended while still in alarm, so the trip's end time bounds
    /// it. A zero fallback means the closing value was never observed and
    /// the reading is assumed to have held steady.
    fn finalize(self, trip_end: DateTime<Utc>, fallback_value: f64) -> AlarmInterval {
        let ended_value = if fallback_value == 0.0 {
            self.started_value
        } else {
            fallback_value
        };
        self.close(trip_end, ended_value)
    }
}

/// Reconstruct event-derived alarm intervals from the trip's boundary event
/// log, appending each closed interval to its channel's set.
///
/// Events are sorted by (channel, timestamp) so one linear scan processes
/// each channel's history in order; per channel the intervals produced are
/// in time order and mutually disjoint.
pub fn build_event_intervals(
    trip: &TripRecord,
    result: &mut TripAlarmSet,
) -> Result<(), ProcessError> {
    let mut events: Vec<&UploadEvent> = trip.upload_events.iter().collect();
    events.sort_by(|a, b| {
        a.channel
            .cmp(&b.channel)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    let mut active_channel: Option<&str> = None;
    let mut open: Option<OpenMeasurement> = None;
    let mut value = 0.0;

    for event in events {
        value =
            event
                .raw_value
                .parse::<f64>()
                .map_err(|source| ProcessError::EventValue {
                    channel: event.channel.clone(),
                    timestamp: event.timestamp,
                    value: event.raw_value.clone(),
                    source,
                })?;

        if active_channel != Some(event.channel.as_str()) {
            // Crossing into a new channel: the previous channel can no
            // longer see a clearing boundary, so force-close its open
            // measurement, then register the new channel.
            if let Some(measurement) = open.take() {
                finalize_into(result, measurement, trip.end_time, value);
            }
            register_channel(trip, result, &event.channel);
            active_channel = Some(event.channel.as_str());
        }

        match BoundaryCode::from_code(event.event_type_code) {
            Some(BoundaryCode::MaxEntered) => {
                if let Some(measurement) = open.take() {
                    finalize_into(result, measurement, trip.end_time, value);
                }
                open = Some(OpenMeasurement {
                    channel: event.channel.clone(),
                    kind: IntervalKind::ExceededMax,
                    started_at: event.timestamp,
                    started_value: value,
                });
            }
            Some(BoundaryCode::MinEntered) => {
                if let Some(measurement) = open.take() {
                    finalize_into(result, measurement, trip.end_time, value);
                }
                open = Some(OpenMeasurement {
                    channel: event.channel.clone(),
                    kind: IntervalKind::ExceededMin,
                    started_at: event.timestamp,
                    started_value: value,
                });
            }
            Some(BoundaryCode::MaxCleared) | Some(BoundaryCode::MinCleared) => {
                // A clearing boundary closes whatever is open without
                // checking that the kinds line up; the recorder is trusted
                // to pair them. A clear with nothing open is dropped.
                if let Some(measurement) = open.take() {
                    let channel = measurement.channel.clone();
                    result
                        .channel_mut(&channel)
                        .push(measurement.close(event.timestamp, value));
                }
            }
            None => {}
        }
    }

    // The log ended while the last channel was still in alarm.
    if let Some(measurement) = open.take() {
        finalize_into(result, measurement, trip.end_time, value);
    }

    Ok(())
}

/// Get-or-create the channel's set and copy its alarm band from settings.
/// A channel with no settings entry keeps the ""/0.0/0.0 defaults.
fn register_channel(trip: &TripRecord, result: &mut TripAlarmSet, channel: &str) {
    let set = result.channel_mut(channel);
    match trip.settings_for(channel) {
        Some(settings) => set.apply_settings(settings),
        None => warn!("no settings entry for channel {channel}; thresholds default to 0/0"),
    }
}

fn finalize_into(
    result: &mut TripAlarmSet,
    measurement: OpenMeasurement,
    trip_end: DateTime<Utc>,
    fallback_value: f64,
) {
    debug!(
        "finalizing dangling alarm on channel {} at trip end {trip_end}",
        measurement.channel
    );
    let channel = measurement.channel.clone();
    result
        .channel_mut(&channel)
        .push(measurement.finalize(trip_end, fallback_value));
}

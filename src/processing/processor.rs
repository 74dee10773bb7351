use log::debug;

use crate::alarms::TripAlarmSet;
use crate::error::ProcessError;
use crate::models::TripRecord;
use crate::processing::{events, raw_data};

/// Compute every channel's alarm intervals and durations for one trip.
///
/// Runs the event pass first, then the raw-data pass; the order matters,
/// since the raw pass reads the channel bands registered by the event pass
/// and merges its excursions against the event-derived intervals already in
/// place. The returned set is self-contained; nothing about the trip is
/// retained anywhere else.
pub fn process_trip(trip: &TripRecord) -> Result<TripAlarmSet, ProcessError> {
    debug!(
        "processing trip {:?}: {} events, {} data points, {} channel settings",
        trip.name,
        trip.upload_events.len(),
        trip.upload_data_points.len(),
        trip.channel_settings.len()
    );

    let mut result = TripAlarmSet::new();
    events::build_event_intervals(trip, &mut result)?;
    raw_data::scan_raw_data(trip, &mut result);
    Ok(result)
}

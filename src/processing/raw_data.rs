use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::alarms::{AlarmInterval, IntervalKind, IntervalSource, TripAlarmSet};
use crate::models::{TripRecord, UploadDataPoint};

/// An out-of-band excursion that has started but not yet returned in band.
struct OpenCandidate {
    channel: String,
    kind: IntervalKind,
    started_at: DateTime<Utc>,
    started_value: f64,
}

impl OpenCandidate {
    fn open(point: &UploadDataPoint, kind: IntervalKind) -> Self {
        Self {
            channel: point.channel.clone(),
            kind,
            started_at: point.timestamp,
            started_value: point.value,
        }
    }

    fn close(self, ended_at: DateTime<Utc>, ended_value: f64) -> (String, AlarmInterval) {
        let channel = self.channel;
        (
            channel,
            AlarmInterval {
                source: IntervalSource::OutsideEvent,
                kind: self.kind,
                started_at: self.started_at,
                ended_at,
                started_value: self.started_value,
                ended_value,
            },
        )
    }

    /// The stream moved on without the value returning in band; bound the
    /// excursion by the trip's end time. A zero last-seen value means the
    /// reading is assumed to have held steady.
    fn finalize(self, trip_end: DateTime<Utc>, last_value: f64) -> (String, AlarmInterval) {
        let ended_value = if last_value == 0.0 {
            self.started_value
        } else {
            last_value
        };
        self.close(trip_end, ended_value)
    }
}

/// Scan the periodic raw measurements for excursions outside each channel's
/// alarm band, recovering conditions the event log missed (the recorder's
/// event memory can overrun). Each excursion is merged into the channel's
/// set via `ChannelAlarmSet::accumulate` so time already covered by an
/// event-derived interval is never double counted.
///
/// A reading exactly on the band edge counts as in alarm.
pub fn scan_raw_data(trip: &TripRecord, result: &mut TripAlarmSet) {
    let mut points: Vec<&UploadDataPoint> = trip.upload_data_points.iter().collect();
    points.sort_by(|a, b| {
        a.channel
            .cmp(&b.channel)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    let mut active_channel: Option<&str> = None;
    let mut open: Option<OpenCandidate> = None;
    let mut last_value = 0.0;
    let (mut min, mut max) = (0.0, 0.0);

    for point in points {
        if active_channel != Some(point.channel.as_str()) {
            // The previous channel's excursion never came back in band;
            // finalize it against that channel's last seen value.
            if let Some(candidate) = open.take() {
                let (channel, interval) = candidate.finalize(trip.end_time, last_value);
                result.channel_mut(&channel).accumulate(interval);
            }

            // The event pass may already have registered this channel;
            // only look up settings if it never did.
            let set = result.channel_mut(&point.channel);
            if set.is_unconfigured() {
                match trip.settings_for(&point.channel) {
                    Some(settings) => set.apply_settings(settings),
                    None => warn!(
                        "no settings entry for channel {}; thresholds default to 0/0",
                        point.channel
                    ),
                }
            }
            // Hold the band in locals for the rest of this channel's points.
            (min, max) = (set.min, set.max);

            debug!("scanning raw data for channel {}", point.channel);
            active_channel = Some(point.channel.as_str());
        }

        if point.value >= max {
            open = match open.take() {
                None => Some(OpenCandidate::open(point, IntervalKind::ExceededMax)),
                Some(candidate) if candidate.kind == IntervalKind::ExceededMin => {
                    // The value jumped straight from one band edge to the
                    // other; this point ends the min excursion and starts
                    // the max one.
                    let (channel, interval) = candidate.close(point.timestamp, point.value);
                    result.channel_mut(&channel).accumulate(interval);
                    Some(OpenCandidate::open(point, IntervalKind::ExceededMax))
                }
                still_open => still_open,
            };
        } else if point.value <= min {
            open = match open.take() {
                None => Some(OpenCandidate::open(point, IntervalKind::ExceededMin)),
                Some(candidate) if candidate.kind == IntervalKind::ExceededMax => {
                    let (channel, interval) = candidate.close(point.timestamp, point.value);
                    result.channel_mut(&channel).accumulate(interval);
                    Some(OpenCandidate::open(point, IntervalKind::ExceededMin))
                }
                still_open => still_open,
            };
        } else if let Some(candidate) = open.take() {
            // Back inside the band; this point bounds the excursion.
            let (channel, interval) = candidate.close(point.timestamp, point.value);
            result.channel_mut(&channel).accumulate(interval);
        }

        last_value = point.value;
    }

    // Data collection ended mid-excursion.
    if let Some(candidate) = open.take() {
        let (channel, interval) = candidate.finalize(trip.end_time, last_value);
        result.channel_mut(&channel).accumulate(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelSettings;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn point(channel: &str, secs: i64, value: f64) -> UploadDataPoint {
        UploadDataPoint {
            channel: channel.to_string(),
            timestamp: ts(secs),
            value,
        }
    }

    fn trip(points: Vec<UploadDataPoint>) -> TripRecord {
        TripRecord {
            name: "trip".to_string(),
            start_time: ts(0),
            end_time: ts(100),
            upload_events: Vec::new(),
            upload_data_points: points,
            channel_settings: vec![ChannelSettings {
                channel_name: "temp".to_string(),
                data_type: "Temperature".to_string(),
                min: 0.0,
                max: 10.0,
            }],
        }
    }

    #[test]
    fn excursion_above_max_becomes_one_interval() {
        let trip = trip(vec![
            point("temp", 1, 3.0),
            point("temp", 2, 12.0),
            point("temp", 3, 13.0),
            point("temp", 4, 4.0),
        ]);
        let mut result = TripAlarmSet::new();
        scan_raw_data(&trip, &mut result);

        let channel = result.channel("temp").unwrap();
        assert_eq!(channel.intervals().len(), 1);
        let interval = &channel.intervals()[0];
        assert_eq!(interval.source, IntervalSource::OutsideEvent);
        assert_eq!(interval.kind, IntervalKind::ExceededMax);
        assert_eq!(interval.started_at, ts(2));
        assert_eq!(interval.started_value, 12.0);
        // The first in-band reading bounds the excursion.
        assert_eq!(interval.ended_at, ts(4));
        assert_eq!(interval.ended_value, 4.0);
    }

    #[test]
    fn reading_on_band_edge_counts_as_in_alarm() {
        let trip = trip(vec![
            point("temp", 1, 10.0),
            point("temp", 2, 5.0),
            point("temp", 3, 0.0),
            point("temp", 4, 5.0),
        ]);
        let mut result = TripAlarmSet::new();
        scan_raw_data(&trip, &mut result);

        let channel = result.channel("temp").unwrap();
        assert_eq!(channel.intervals().len(), 2);
        assert_eq!(channel.intervals()[0].kind, IntervalKind::ExceededMax);
        assert_eq!(channel.intervals()[1].kind, IntervalKind::ExceededMin);
    }

    #[test]
    fn jump_across_band_closes_min_and_opens_max() {
        let trip = trip(vec![
            point("temp", 1, -4.0),
            point("temp", 2, 14.0),
            point("temp", 3, 5.0),
        ]);
        let mut result = TripAlarmSet::new();
        scan_raw_data(&trip, &mut result);

        let channel = result.channel("temp").unwrap();
        assert_eq!(channel.intervals().len(), 2);
        let min_interval = &channel.intervals()[0];
        assert_eq!(min_interval.kind, IntervalKind::ExceededMin);
        assert_eq!((min_interval.started_at, min_interval.ended_at), (ts(1), ts(2)));
        let max_interval = &channel.intervals()[1];
        assert_eq!(max_interval.kind, IntervalKind::ExceededMax);
        assert_eq!((max_interval.started_at, max_interval.ended_at), (ts(2), ts(3)));
    }

    #[test]
    fn dangling_excursion_finalizes_at_trip_end() {
        let trip = trip(vec![point("temp", 10, 12.0), point("temp", 20, 15.0)]);
        let mut result = TripAlarmSet::new();
        scan_raw_data(&trip, &mut result);

        let interval = &result.channel("temp").unwrap().intervals()[0];
        assert_eq!(interval.started_at, ts(10));
        assert_eq!(interval.ended_at, ts(100));
        assert_eq!(interval.ended_value, 15.0);
    }

    #[test]
    fn channel_crossing_finalizes_with_previous_channels_last_value() {
        let mut records = trip(vec![
            point("temp", 10, 12.0),
            point("temp", 20, 15.0),
            point("wind", 5, 7.0),
        ]);
        records.channel_settings.push(ChannelSettings {
            channel_name: "wind".to_string(),
            data_type: "Wind".to_string(),
            min: 0.0,
            max: 50.0,
        });
        let mut result = TripAlarmSet::new();
        scan_raw_data(&records, &mut result);

        let temp = result.channel("temp").unwrap();
        assert_eq!(temp.intervals().len(), 1);
        let interval = &temp.intervals()[0];
        assert_eq!(interval.ended_at, ts(100));
        // The excursion closes on temp's own last reading, not wind's first.
        assert_eq!(interval.ended_value, 15.0);
        assert!(result.channel("wind").unwrap().intervals().is_empty());
    }

    #[test]
    fn band_refreshes_at_channel_crossing() {
        let mut records = trip(vec![
            point("temp", 1, 5.0),
            point("wind", 1, 20.0),
            point("wind", 2, 60.0),
            point("wind", 3, 10.0),
        ]);
        records.channel_settings.push(ChannelSettings {
            channel_name: "wind".to_string(),
            data_type: "Wind".to_string(),
            min: 0.0,
            max: 50.0,
        });
        let mut result = TripAlarmSet::new();
        scan_raw_data(&records, &mut result);

        assert!(result.channel("temp").unwrap().intervals().is_empty());
        // 20 is out of band only under temp's [0, 10]; wind's own band
        // applies after the crossing, so only the 60 reading alarms.
        let wind = result.channel("wind").unwrap();
        assert_eq!(wind.intervals().len(), 1);
        let interval = &wind.intervals()[0];
        assert_eq!(interval.kind, IntervalKind::ExceededMax);
        assert_eq!((interval.started_at, interval.ended_at), (ts(2), ts(3)));
    }

    #[test]
    fn unknown_channel_defaults_to_zero_thresholds() {
        init_logs();
        // "mystery" has no settings entry, so min = max = 0 and every
        // reading at or above zero is an exceeded-max alarm.
        let trip = trip(vec![
            point("mystery", 1, 2.0),
            point("mystery", 2, 3.0),
            point("mystery", 3, 1.0),
        ]);
        let mut result = TripAlarmSet::new();
        scan_raw_data(&trip, &mut result);

        let channel = result.channel("mystery").unwrap();
        assert!(channel.is_unconfigured());
        assert_eq!(channel.min, 0.0);
        assert_eq!(channel.max, 0.0);
        assert_eq!(channel.intervals().len(), 1);
        let interval = &channel.intervals()[0];
        assert_eq!(interval.kind, IntervalKind::ExceededMax);
        assert_eq!((interval.started_at, interval.ended_at), (ts(1), ts(100)));
    }
}

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::alarms::channel::ChannelAlarmSet;

/// Every channel's alarm intervals for one processed trip.
///
/// Channels are kept in first-seen order; lookup is linear, which is fine
/// for the handful of channels a single recording carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAlarmSet {
    channels: Vec<ChannelAlarmSet>,
}

impl TripAlarmSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channels(&self) -> &[ChannelAlarmSet] {
        &self.channels
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelAlarmSet> {
        self.channels.iter().find(|c| c.channel == name)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.channel.as_str())
    }

    /// Find a channel's set, creating an empty one if it has not been seen.
    pub(crate) fn channel_mut(&mut self, name: &str) -> &mut ChannelAlarmSet {
        // Index-based to keep the borrow checker out of the find/push dance.
        let idx = match self.channels.iter().position(|c| c.channel == name) {
            Some(idx) => idx,
            None => {
                self.channels.push(ChannelAlarmSet::new(name));
                self.channels.len() - 1
            }
        };
        &mut self.channels[idx]
    }

    pub fn duration_from_events(&self) -> Duration {
        self.sum_over(ChannelAlarmSet::duration_from_events)
    }

    pub fn duration_outside_events(&self) -> Duration {
        self.sum_over(ChannelAlarmSet::duration_outside_events)
    }

    pub fn total_duration(&self) -> Duration {
        self.duration_from_events() + self.duration_outside_events()
    }

    pub fn total_exceeded_max(&self) -> Duration {
        self.sum_over(ChannelAlarmSet::total_exceeded_max)
    }

    pub fn total_exceeded_min(&self) -> Duration {
        self.sum_over(ChannelAlarmSet::total_exceeded_min)
    }

    fn sum_over(&self, per_channel: impl Fn(&ChannelAlarmSet) -> Duration) -> Duration {
        self.channels
            .iter()
            .map(per_channel)
            .fold(Duration::zero(), |total, d| total + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarms::interval::{AlarmInterval, IntervalKind, IntervalSource};
    use chrono::{DateTime, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn channel_lookup_creates_once_and_preserves_order() {
        let mut set = TripAlarmSet::new();
        set.channel_mut("temp");
        set.channel_mut("humidity");
        set.channel_mut("temp");

        let names: Vec<&str> = set.channel_names().collect();
        assert_eq!(names, vec!["temp", "humidity"]);
        assert!(set.channel("temp").is_some());
        assert!(set.channel("pressure").is_none());
    }

    #[test]
    fn trip_aggregates_sum_across_channels() {
        let mut set = TripAlarmSet::new();
        set.channel_mut("a").push(AlarmInterval {
            source: IntervalSource::FromEvent,
            kind: IntervalKind::ExceededMax,
            started_at: ts(0),
            ended_at: ts(40),
            started_value: 11.0,
            ended_value: 8.0,
        });
        set.channel_mut("b").push(AlarmInterval {
            source: IntervalSource::OutsideEvent,
            kind: IntervalKind::ExceededMin,
            started_at: ts(100),
            ended_at: ts(160),
            started_value: -3.0,
            ended_value: 1.0,
        });

        assert_eq!(set.duration_from_events(), Duration::seconds(40));
        assert_eq!(set.duration_outside_events(), Duration::seconds(60));
        assert_eq!(set.total_duration(), Duration::seconds(100));
        assert_eq!(set.total_exceeded_max(), Duration::seconds(40));
        assert_eq!(set.total_exceeded_min(), Duration::seconds(60));
    }
}

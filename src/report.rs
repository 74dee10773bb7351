use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alarms::{AlarmInterval, ChannelAlarmSet, TripAlarmSet};

/// One list entry for a presentation layer: a channel's (or the whole
/// trip's) alarm summary rendered as text. A thin derived view; every
/// number here comes straight from the interval aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Summary item for a single channel.
pub fn channel_item(channel: &ChannelAlarmSet) -> ReportItem {
    let mut description = format!(
        "Total Duration: {}\nEvent Duration: {}\nOutside Event Duration: {}\nTotal Exceeded Maximum: {}\nTotal Exceeded Minimum: {}\n\nDETAILS\n",
        format_duration(channel.total_duration()),
        format_duration(channel.duration_from_events()),
        format_duration(channel.duration_outside_events()),
        format_duration(channel.total_exceeded_max()),
        format_duration(channel.total_exceeded_min()),
    );
    for interval in channel.intervals() {
        description.push_str(&interval_line(interval));
    }

    ReportItem {
        id: Uuid::new_v4().to_string(),
        title: format!("{} Alarms", channel.data_type),
        description,
    }
}

/// Summary item for the whole trip.
pub fn trip_item(trip: &TripAlarmSet) -> ReportItem {
    let description = format!(
        "Overall Alarm Duration: {}\nOverall Event Duration: {}\nOverall Outside Event Duration: {}\nOverall Exceeded Maximum: {}\nOverall Exceeded Minimum: {}\n",
        format_duration(trip.total_duration()),
        format_duration(trip.duration_from_events()),
        format_duration(trip.duration_outside_events()),
        format_duration(trip.total_exceeded_max()),
        format_duration(trip.total_exceeded_min()),
    );

    ReportItem {
        id: Uuid::new_v4().to_string(),
        title: "All Alarms".to_string(),
        description,
    }
}

fn interval_line(interval: &AlarmInterval) -> String {
    format!(
        "* {} For {} Value {} To {} {}.\n",
        interval.kind.as_str(),
        format_duration(interval.duration()),
        interval.started_value,
        interval.ended_value,
        interval.source.as_str(),
    )
}

/// Render a non-negative duration as `h:mm:ss`.
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds();
    format!(
        "{}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded trip as produced by the upload loader: the recording window,
/// the device's event log, the periodic raw measurements, and the alarm
/// settings that were active for each channel.
///
/// Events, data points, and settings are consumed read-only and need not be
/// pre-sorted; sorting is handled during processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub upload_events: Vec<UploadEvent>,
    #[serde(default)]
    pub upload_data_points: Vec<UploadDataPoint>,
    #[serde(default)]
    pub channel_settings: Vec<ChannelSettings>,
}

impl TripRecord {
    /// Find the settings entry for a channel by exact name match.
    pub fn settings_for(&self, channel: &str) -> Option<&ChannelSettings> {
        self.channel_settings
            .iter()
            .find(|s| s.channel_name == channel)
    }
}

/// A discrete alarm-boundary event from the device's event log.
///
/// The device stores the reading as text; `event_type_code` selects the
/// boundary kind (see `processing::events::BoundaryCode`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEvent {
    pub channel: String,
    pub timestamp: DateTime<Utc>,
    pub raw_value: String,
    pub event_type_code: i32,
}

/// One periodic raw measurement for a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDataPoint {
    pub channel: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Alarm band configuration for one channel on this trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSettings {
    pub channel_name: String,
    pub data_type: String,
    pub min: f64,
    pub max: f64,
}

//! Alarm-interval reconstruction for recorded trip logs.
//!
//! A data logger records, per trip, a log of discrete alarm-boundary events
//! and a stream of periodic raw measurements for each of its channels. This
//! crate rebuilds the time each channel spent in alarm (value outside its
//! configured `[min, max]` band) from both sources: explicit entered/cleared
//! boundary events, plus excursions inferred from raw readings the event
//! log missed (the device's event memory can overrun mid-trip).
//!
//! The single entry point is [`processing::process_trip`]:
//!
//! ```ignore
//! let record: trip_alarms::TripRecord = serde_json::from_str(&upload)?;
//! let result = trip_alarms::process_trip(&record)?;
//! for channel in result.channels() {
//!     println!("{}: {}", channel.channel, channel.total_duration());
//! }
//! ```

pub mod alarms;
pub mod error;
pub mod models;
pub mod processing;
pub mod report;

pub use alarms::{AlarmInterval, ChannelAlarmSet, IntervalKind, IntervalSource, TripAlarmSet};
pub use error::ProcessError;
pub use models::{ChannelSettings, TripRecord, UploadDataPoint, UploadEvent};
pub use processing::process_trip;
pub use report::ReportItem;

pub mod trip;

pub use trip::{ChannelSettings, TripRecord, UploadDataPoint, UploadEvent};

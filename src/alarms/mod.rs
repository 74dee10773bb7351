pub mod channel;
pub mod interval;
pub mod trip;

pub use channel::ChannelAlarmSet;
pub use interval::{AlarmInterval, IntervalKind, IntervalSource};
pub use trip::TripAlarmSet;

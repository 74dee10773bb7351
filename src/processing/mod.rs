pub mod events;
pub mod processor;
pub mod raw_data;

pub use processor::process_trip;

//! The transform layer: deterministic mapping, join, and partition rules
//! that reshape the two raw record streams into the five star schema tables.

pub mod join;
pub mod log;
pub mod song;
pub mod time;

pub use join::SongIndex;
pub use log::{LogTables, transform_logs};
pub use song::{SongTables, transform_songs};
pub use time::{START_TIME_FORMAT, TimeParts};

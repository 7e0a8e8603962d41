//! Input record types for the two source datasets.
//!
//! Song metadata files carry one JSON object per line describing a track and
//! its artist. Activity log files carry one JSON object per line describing a
//! user interaction; log data comes from external instrumentation and is
//! expected to be noisy, so the fields the transform recovers from (`ts`,
//! `userId`) use tolerant decoders instead of failing the whole file.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A song metadata record.
#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
    pub year: i32,
    pub duration: f64,
}

/// A user activity log record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    /// Event time in epoch milliseconds. `None` when the source value is
    /// missing or not numeric; such rows are dropped and counted by the
    /// log transform.
    #[serde(default, deserialize_with = "lenient_epoch_ms")]
    pub ts: Option<i64>,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl LogRecord {
    /// The page value marking a song-play event.
    pub const NEXT_SONG: &'static str = "NextSong";

    /// Whether this record is a song-play event.
    pub fn is_song_play(&self) -> bool {
        self.page == Self::NEXT_SONG
    }
}

/// Decode a value that may be a string or a number into a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Decode an epoch-millisecond timestamp, tolerating malformed values.
///
/// Accepts integers, floats (truncated), and strings of digits. Anything else
/// decodes to `None` rather than failing the record.
fn lenient_epoch_ms<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

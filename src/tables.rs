//! Output table definitions for the star schema.
//!
//! Each table is a typed row struct plus an implementation of [`Table`], which
//! carries the table name, Arrow schema, partition layout, and the conversion
//! from rows to a `RecordBatch`. Column names and partition keys live here, in
//! one place, checked at build time.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float64Builder, Int32Builder, Int64Builder, RecordBatch, StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;

/// An output table of the star schema.
pub trait Table: Sized {
    /// Table name; doubles as the directory name under the output root.
    const NAME: &'static str;

    /// Columns the table is physically partitioned by, outermost first.
    const PARTITION_COLUMNS: &'static [&'static str];

    /// The Arrow schema of the table.
    fn schema() -> SchemaRef;

    /// Partition values for this row, aligned with `PARTITION_COLUMNS`.
    fn partition_values(&self) -> Vec<String>;

    /// Assemble rows into a single record batch.
    fn to_batch(rows: &[Self]) -> Result<RecordBatch, ArrowError>;
}

/// A row of the songs dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

impl Table for SongRow {
    const NAME: &'static str = "songs";
    const PARTITION_COLUMNS: &'static [&'static str] = &["year", "artist_id"];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("song_id", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("artist_id", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("duration", DataType::Float64, false),
        ]))
    }

    fn partition_values(&self) -> Vec<String> {
        vec![self.year.to_string(), self.artist_id.clone()]
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, ArrowError> {
        let mut song_id = StringBuilder::new();
        let mut title = StringBuilder::new();
        let mut artist_id = StringBuilder::new();
        let mut year = Int32Builder::new();
        let mut duration = Float64Builder::new();

        for row in rows {
            song_id.append_value(&row.song_id);
            title.append_value(&row.title);
            artist_id.append_value(&row.artist_id);
            year.append_value(row.year);
            duration.append_value(row.duration);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(song_id.finish()),
            Arc::new(title.finish()),
            Arc::new(artist_id.finish()),
            Arc::new(year.finish()),
            Arc::new(duration.finish()),
        ];
        RecordBatch::try_new(Self::schema(), columns)
    }
}

/// A row of the artists dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

impl Table for ArtistRow {
    const NAME: &'static str = "artists";
    const PARTITION_COLUMNS: &'static [&'static str] = &[];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("artist_id", DataType::Utf8, false),
            Field::new("artist_name", DataType::Utf8, false),
            Field::new("artist_location", DataType::Utf8, true),
            Field::new("artist_latitude", DataType::Float64, true),
            Field::new("artist_longitude", DataType::Float64, true),
        ]))
    }

    fn partition_values(&self) -> Vec<String> {
        Vec::new()
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, ArrowError> {
        let mut artist_id = StringBuilder::new();
        let mut artist_name = StringBuilder::new();
        let mut artist_location = StringBuilder::new();
        let mut artist_latitude = Float64Builder::new();
        let mut artist_longitude = Float64Builder::new();

        for row in rows {
            artist_id.append_value(&row.artist_id);
            artist_name.append_value(&row.artist_name);
            artist_location.append_option(row.artist_location.as_deref());
            artist_latitude.append_option(row.artist_latitude);
            artist_longitude.append_option(row.artist_longitude);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(artist_id.finish()),
            Arc::new(artist_name.finish()),
            Arc::new(artist_location.finish()),
            Arc::new(artist_latitude.finish()),
            Arc::new(artist_longitude.finish()),
        ];
        RecordBatch::try_new(Self::schema(), columns)
    }
}

/// A row of the users dimension.
///
/// Column names keep the source log field casing so downstream queries match
/// the upstream instrumentation contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserRow {
    pub userid: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

impl Table for UserRow {
    const NAME: &'static str = "users";
    const PARTITION_COLUMNS: &'static [&'static str] = &[];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("userid", DataType::Utf8, false),
            Field::new("firstName", DataType::Utf8, true),
            Field::new("lastName", DataType::Utf8, true),
            Field::new("gender", DataType::Utf8, true),
            Field::new("level", DataType::Utf8, true),
        ]))
    }

    fn partition_values(&self) -> Vec<String> {
        Vec::new()
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, ArrowError> {
        let mut userid = StringBuilder::new();
        let mut first_name = StringBuilder::new();
        let mut last_name = StringBuilder::new();
        let mut gender = StringBuilder::new();
        let mut level = StringBuilder::new();

        for row in rows {
            userid.append_value(&row.userid);
            first_name.append_option(row.first_name.as_deref());
            last_name.append_option(row.last_name.as_deref());
            gender.append_option(row.gender.as_deref());
            level.append_option(row.level.as_deref());
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(userid.finish()),
            Arc::new(first_name.finish()),
            Arc::new(last_name.finish()),
            Arc::new(gender.finish()),
            Arc::new(level.finish()),
        ];
        RecordBatch::try_new(Self::schema(), columns)
    }
}

/// A row of the time dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: String,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub month: i32,
    pub year: i32,
    pub weekday: i32,
}

impl Table for TimeRow {
    const NAME: &'static str = "time";
    const PARTITION_COLUMNS: &'static [&'static str] = &["year", "month"];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("start_time", DataType::Utf8, false),
            Field::new("hour", DataType::Int32, false),
            Field::new("day", DataType::Int32, false),
            Field::new("week", DataType::Int32, false),
            Field::new("month", DataType::Int32, false),
            Field::new("year", DataType::Int32, false),
            Field::new("weekday", DataType::Int32, false),
        ]))
    }

    fn partition_values(&self) -> Vec<String> {
        vec![self.year.to_string(), self.month.to_string()]
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, ArrowError> {
        let mut start_time = StringBuilder::new();
        let mut hour = Int32Builder::new();
        let mut day = Int32Builder::new();
        let mut week = Int32Builder::new();
        let mut month = Int32Builder::new();
        let mut year = Int32Builder::new();
        let mut weekday = Int32Builder::new();

        for row in rows {
            start_time.append_value(&row.start_time);
            hour.append_value(row.hour);
            day.append_value(row.day);
            week.append_value(row.week);
            month.append_value(row.month);
            year.append_value(row.year);
            weekday.append_value(row.weekday);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(start_time.finish()),
            Arc::new(hour.finish()),
            Arc::new(day.finish()),
            Arc::new(week.finish()),
            Arc::new(month.finish()),
            Arc::new(year.finish()),
            Arc::new(weekday.finish()),
        ];
        RecordBatch::try_new(Self::schema(), columns)
    }
}

/// A row of the songplays fact table.
#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
    pub start_time: String,
    pub user_id: String,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub year: i32,
    pub month: i32,
}

impl Table for SongplayRow {
    const NAME: &'static str = "songplays";
    const PARTITION_COLUMNS: &'static [&'static str] = &["year", "month"];

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("start_time", DataType::Utf8, false),
            Field::new("user_id", DataType::Utf8, false),
            Field::new("level", DataType::Utf8, true),
            Field::new("song_id", DataType::Utf8, true),
            Field::new("artist_id", DataType::Utf8, true),
            Field::new("sessionId", DataType::Int64, true),
            Field::new("location", DataType::Utf8, true),
            Field::new("userAgent", DataType::Utf8, true),
            Field::new("year", DataType::Int32, false),
            Field::new("month", DataType::Int32, false),
        ]))
    }

    fn partition_values(&self) -> Vec<String> {
        vec![self.year.to_string(), self.month.to_string()]
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, ArrowError> {
        let mut start_time = StringBuilder::new();
        let mut user_id = StringBuilder::new();
        let mut level = StringBuilder::new();
        let mut song_id = StringBuilder::new();
        let mut artist_id = StringBuilder::new();
        let mut session_id = Int64Builder::new();
        let mut location = StringBuilder::new();
        let mut user_agent = StringBuilder::new();
        let mut year = Int32Builder::new();
        let mut month = Int32Builder::new();

        for row in rows {
            start_time.append_value(&row.start_time);
            user_id.append_value(&row.user_id);
            level.append_option(row.level.as_deref());
            song_id.append_option(row.song_id.as_deref());
            artist_id.append_option(row.artist_id.as_deref());
            session_id.append_option(row.session_id);
            location.append_option(row.location.as_deref());
            user_agent.append_option(row.user_agent.as_deref());
            year.append_value(row.year);
            month.append_value(row.month);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(start_time.finish()),
            Arc::new(user_id.finish()),
            Arc::new(level.finish()),
            Arc::new(song_id.finish()),
            Arc::new(artist_id.finish()),
            Arc::new(session_id.finish()),
            Arc::new(location.finish()),
            Arc::new(user_agent.finish()),
            Arc::new(year.finish()),
            Arc::new(month.finish()),
        ];
        RecordBatch::try_new(Self::schema(), columns)
    }
}

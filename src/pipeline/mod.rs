//! Job driver.
//!
//! Sequences the song transform and the log transform against the configured
//! input and output roots. The only state shared between the two stages is
//! the read-only song relation, which the log transform joins against. Any
//! read or write failure aborts the run; only individual rows with unusable
//! timestamps are dropped (and counted) along the way.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::emit;
use crate::error::JobError;
use crate::metrics::events::RowsSkipped;
use crate::model::{LogRecord, SongRecord};
use crate::sink::TableWriter;
use crate::source::RecordReader;
use crate::storage::StorageProvider;
use crate::transform::{transform_logs, transform_songs};

/// Row counts from a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStats {
    pub songs: usize,
    pub artists: usize,
    pub users: usize,
    pub time: usize,
    pub songplays: usize,
    /// Song-play records dropped for unusable timestamps.
    pub skipped_rows: usize,
}

/// Run the full batch job described by `config`.
pub async fn run_job(config: &Config) -> Result<JobStats, JobError> {
    let input =
        StorageProvider::for_url_with_options(&config.input.path, config.input_storage_options())
            .await?;
    let output =
        StorageProvider::for_url_with_options(&config.output.path, config.output_storage_options())
            .await?;

    info!(
        input = input.canonical_url(),
        output = output.canonical_url(),
        "Starting job"
    );

    let reader = RecordReader::new(Arc::new(input));
    let writer = TableWriter::new(Arc::new(output), config.parquet.compression);

    let songs: Vec<SongRecord> = reader.read_records(&config.song_prefix, "songs").await?;
    let song_tables = transform_songs(&songs);
    writer.write_table(&song_tables.songs).await?;
    writer.write_table(&song_tables.artists).await?;

    let logs: Vec<LogRecord> = reader.read_records(&config.log_prefix, "logs").await?;
    let log_tables = transform_logs(&logs, &songs);
    if log_tables.skipped_rows > 0 {
        warn!(
            skipped = log_tables.skipped_rows,
            "Dropped song-play records with unusable timestamps"
        );
        emit!(RowsSkipped {
            count: log_tables.skipped_rows as u64,
        });
    }
    writer.write_table(&log_tables.users).await?;
    writer.write_table(&log_tables.time).await?;
    writer.write_table(&log_tables.songplays).await?;

    let stats = JobStats {
        songs: song_tables.songs.len(),
        artists: song_tables.artists.len(),
        users: log_tables.users.len(),
        time: log_tables.time.len(),
        songplays: log_tables.songplays.len(),
        skipped_rows: log_tables.skipped_rows,
    };

    info!(
        songs = stats.songs,
        artists = stats.artists,
        users = stats.users,
        time = stats.time,
        songplays = stats.songplays,
        skipped_rows = stats.skipped_rows,
        "Job complete"
    );

    Ok(stats)
}

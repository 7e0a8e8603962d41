//! Starlift: batch loader for a song-play star schema.
//!
//! This crate handles:
//! - Reading newline-delimited JSON song metadata and activity logs from
//!   object storage (S3, local)
//! - Deriving the five star schema tables (songs, artists, users, time,
//!   songplays) with deterministic dedup and join tie-breaks
//! - Writing each table as partitioned Parquet with overwrite semantics

pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod storage;
pub mod tables;
pub mod tracing;
pub mod transform;

// Re-export commonly used items
pub use config::Config;
pub use error::JobError;
pub use pipeline::{JobStats, run_job};
pub use crate::tracing::init_tracing;

//! Error types for the starlift batch loader.
//!
//! The taxonomy follows the job's failure policy: configuration, read, and
//! write failures abort the run; individual malformed rows are dropped and
//! counted by the log transform rather than surfaced here.

use snafu::prelude::*;

/// Errors that can occur during storage operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// Invalid storage URL format.
    #[snafu(display("Invalid storage URL: {url}"))]
    InvalidUrl { url: String },

    /// Object store operation failed.
    #[snafu(display("Storage operation failed: {source}"))]
    ObjectStore { source: object_store::Error },

    /// IO error during storage operations.
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// S3 configuration error.
    #[snafu(display("S3 configuration error: {source}"))]
    S3Config { source: object_store::Error },
}

impl StorageError {
    /// Check if this error represents a "not found" condition (404, NoSuchKey, etc.)
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::ObjectStore { source } => {
                matches!(source, object_store::Error::NotFound { .. })
            }
            _ => false,
        }
    }
}

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// Input path is empty.
    #[snafu(display("Input path cannot be empty"))]
    EmptyInputPath,

    /// Output path is empty.
    #[snafu(display("Output path cannot be empty"))]
    EmptyOutputPath,

    /// Source prefix is empty.
    #[snafu(display("Source prefix for {dataset} cannot be empty"))]
    EmptyPrefix { dataset: &'static str },
}

/// Errors that can occur while reading source records.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReadError {
    /// Failed to list the source prefix.
    #[snafu(display("Failed to list {prefix}: {source}"))]
    List {
        prefix: String,
        source: StorageError,
    },

    /// Failed to fetch a source file.
    #[snafu(display("Failed to read {path}: {source}"))]
    Fetch {
        path: String,
        source: StorageError,
    },

    /// A source record does not match the expected shape.
    #[snafu(display("Malformed record at {path} line {line}: {source}"))]
    Decode {
        path: String,
        line: usize,
        source: serde_json::Error,
    },
}

/// Errors that can occur while writing output tables.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WriteError {
    /// Failed to assemble rows into an Arrow batch.
    #[snafu(display("Failed to build record batch for {table}: {source}"))]
    BatchBuild {
        table: &'static str,
        source: arrow::error::ArrowError,
    },

    /// Failed to create a Parquet writer.
    #[snafu(display("Failed to create Parquet writer: {source}"))]
    WriterCreate {
        source: parquet::errors::ParquetError,
    },

    /// Failed to serialize to Parquet.
    #[snafu(display("Failed to write to Parquet: {source}"))]
    ParquetWrite {
        source: parquet::errors::ParquetError,
    },

    /// Failed to replace the published table contents.
    #[snafu(display("Failed to publish table {table}: {source}"))]
    Publish {
        table: &'static str,
        source: StorageError,
    },
}

/// Top-level job errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum JobError {
    /// Configuration error.
    #[snafu(display("Configuration error: {source}"))]
    Config { source: ConfigError },

    /// Storage error.
    #[snafu(display("Storage error: {source}"))]
    Storage { source: StorageError },

    /// Source read error.
    #[snafu(display("Read error: {source}"))]
    Read { source: ReadError },

    /// Table write error.
    #[snafu(display("Write error: {source}"))]
    Write { source: WriteError },
}

impl From<ConfigError> for JobError {
    fn from(source: ConfigError) -> Self {
        JobError::Config { source }
    }
}

impl From<StorageError> for JobError {
    fn from(source: StorageError) -> Self {
        JobError::Storage { source }
    }
}

impl From<ReadError> for JobError {
    fn from(source: ReadError) -> Self {
        JobError::Read { source }
    }
}

impl From<WriteError> for JobError {
    fn from(source: WriteError) -> Self {
        JobError::Write { source }
    }
}

//! Configuration for the starlift batch job.

mod vars;

pub use vars::{InterpolationResult, interpolate};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;

/// A storage location (input root or output root).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// URL of the location (supports S3 and local paths).
    pub path: String,
    /// Extra storage options (region, endpoint, etc.) passed to the backend.
    #[serde(default)]
    pub storage_options: HashMap<String, String>,
}

/// Static credential pair applied to S3 locations.
///
/// Credentials are carried explicitly through the configuration object and
/// handed to the storage backend as options; the process environment is never
/// mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Parquet compression codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParquetCompression {
    Uncompressed,
    #[default]
    Snappy,
    Gzip,
    Zstd,
    Lz4,
}

/// Output file options.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ParquetConfig {
    /// Compression codec for output files.
    #[serde(default)]
    pub compression: ParquetCompression,
}

/// Main configuration for a starlift run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Input root containing the song and log datasets.
    pub input: LocationConfig,
    /// Output root the star schema tables are written under.
    pub output: LocationConfig,
    /// Optional S3 credentials applied to both locations.
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
    /// Prefix of song metadata files under the input root.
    #[serde(default = "default_song_prefix")]
    pub song_prefix: String,
    /// Prefix of activity log files under the input root.
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    /// Output file options.
    #[serde(default)]
    pub parquet: ParquetConfig,
}

fn default_song_prefix() -> String {
    "song_data".to_string()
}

fn default_log_prefix() -> String {
    "log_data".to_string()
}

impl Config {
    /// Load configuration from a file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile { source })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let result = interpolate(contents);
        if !result.is_ok() {
            return Err(ConfigError::EnvInterpolation {
                message: result.errors.join("\n"),
            });
        }

        let config: Config = serde_yaml::from_str(&result.text)
            .map_err(|source| ConfigError::YamlParse { source })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.path.is_empty() {
            return Err(ConfigError::EmptyInputPath);
        }
        if self.output.path.is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }
        if self.song_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix { dataset: "songs" });
        }
        if self.log_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix { dataset: "logs" });
        }
        Ok(())
    }

    /// Storage options for the input location, with credentials merged in.
    pub fn input_storage_options(&self) -> HashMap<String, String> {
        self.merged_options(&self.input)
    }

    /// Storage options for the output location, with credentials merged in.
    pub fn output_storage_options(&self) -> HashMap<String, String> {
        self.merged_options(&self.output)
    }

    fn merged_options(&self, location: &LocationConfig) -> HashMap<String, String> {
        let mut options = location.storage_options.clone();
        if let Some(credentials) = &self.credentials {
            options
                .entry("aws_access_key_id".to_string())
                .or_insert_with(|| credentials.access_key_id.clone());
            options
                .entry("aws_secret_access_key".to_string())
                .or_insert_with(|| credentials.secret_access_key.clone());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
input:
  path: "s3://raw-events/ingest"
output:
  path: "s3://warehouse/star"
credentials:
  access_key_id: AKIATEST
  secret_access_key: sekrit
parquet:
  compression: zstd
"#;
        let config = Config::parse(yaml).unwrap();

        assert_eq!(config.input.path, "s3://raw-events/ingest");
        assert_eq!(config.output.path, "s3://warehouse/star");
        assert_eq!(config.song_prefix, "song_data");
        assert_eq!(config.log_prefix, "log_data");
        assert_eq!(config.parquet.compression, ParquetCompression::Zstd);
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
input:
  path: "/data/raw"
output:
  path: "/data/warehouse"
"#;
        let config = Config::parse(yaml).unwrap();

        assert!(config.credentials.is_none());
        assert_eq!(config.parquet.compression, ParquetCompression::Snappy);
        assert!(config.input_storage_options().is_empty());
    }

    #[test]
    fn test_credentials_merge_into_storage_options() {
        let yaml = r#"
input:
  path: "s3://raw-events/ingest"
output:
  path: "s3://warehouse/star"
  storage_options:
    aws_region: eu-west-1
credentials:
  access_key_id: AKIATEST
  secret_access_key: sekrit
"#;
        let config = Config::parse(yaml).unwrap();

        let input = config.input_storage_options();
        assert_eq!(input.get("aws_access_key_id").unwrap(), "AKIATEST");
        assert_eq!(input.get("aws_secret_access_key").unwrap(), "sekrit");

        let output = config.output_storage_options();
        assert_eq!(output.get("aws_region").unwrap(), "eu-west-1");
        assert_eq!(output.get("aws_access_key_id").unwrap(), "AKIATEST");
    }

    #[test]
    fn test_explicit_options_win_over_credentials() {
        let yaml = r#"
input:
  path: "s3://raw-events/ingest"
  storage_options:
    aws_access_key_id: OVERRIDE
output:
  path: "s3://warehouse/star"
credentials:
  access_key_id: AKIATEST
  secret_access_key: sekrit
"#;
        let config = Config::parse(yaml).unwrap();
        let input = config.input_storage_options();
        assert_eq!(input.get("aws_access_key_id").unwrap(), "OVERRIDE");
    }

    #[test]
    fn test_empty_paths_rejected() {
        let yaml = r#"
input:
  path: ""
output:
  path: "/out"
"#;
        assert!(matches!(
            Config::parse(yaml),
            Err(ConfigError::EmptyInputPath)
        ));
    }
}

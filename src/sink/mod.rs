//! Table writer.
//!
//! Persists a table to the output root as partitioned Parquet with overwrite
//! semantics. Rows are grouped by their partition values into Hive-style
//! directories (`year=2018/month=11/part-00000.parquet`). File names are
//! deterministic so reruns over identical inputs produce identical output.
//!
//! Publishing a table is two-phase: every partition is serialized before the
//! destination is touched, then the table's previous files are deleted and
//! the new ones uploaded. A serialization failure therefore never disturbs
//! published data.

mod parquet;

pub use self::parquet::serialize_batch;

use bytes::Bytes;
use object_store::path::Path;
use snafu::ResultExt;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::ParquetCompression;
use crate::emit;
use crate::error::{BatchBuildSnafu, PublishSnafu, WriteError};
use crate::metrics::events::{ParquetFileWritten, TableWritten};
use crate::storage::StorageProviderRef;
use crate::tables::Table;

/// A serialized output file awaiting upload.
#[derive(Debug, Clone)]
pub struct TableFile {
    /// Path relative to the output root (includes the table directory).
    pub path: String,
    /// Finished Parquet bytes.
    pub bytes: Bytes,
    /// Number of rows in the file.
    pub rows: usize,
}

/// Summary of a published table.
#[derive(Debug, Clone, Copy)]
pub struct WriteSummary {
    pub table: &'static str,
    pub rows: usize,
    pub files: usize,
}

/// Writer that publishes tables under an output root.
pub struct TableWriter {
    storage: StorageProviderRef,
    compression: ParquetCompression,
}

impl TableWriter {
    /// Create a writer over the given storage provider.
    pub fn new(storage: StorageProviderRef, compression: ParquetCompression) -> Self {
        Self {
            storage,
            compression,
        }
    }

    /// Publish a table, replacing whatever was previously at its location.
    pub async fn write_table<T: Table + Clone>(
        &self,
        rows: &[T],
    ) -> Result<WriteSummary, WriteError> {
        let files = self.serialize_partitions(rows)?;

        self.replace_table_files::<T>(&files).await?;

        let summary = WriteSummary {
            table: T::NAME,
            rows: rows.len(),
            files: files.len(),
        };
        emit!(TableWritten {
            table: T::NAME,
            rows: summary.rows as u64,
            files: summary.files as u64,
        });
        info!(
            table = T::NAME,
            rows = summary.rows,
            files = summary.files,
            "Published table"
        );

        Ok(summary)
    }

    /// Group rows by partition values and serialize one file per partition.
    fn serialize_partitions<T: Table + Clone>(
        &self,
        rows: &[T],
    ) -> Result<Vec<TableFile>, WriteError> {
        // BTreeMap keeps partition directories in a stable order.
        let mut partitions: BTreeMap<String, Vec<T>> = BTreeMap::new();
        for row in rows {
            partitions
                .entry(partition_dir::<T>(row))
                .or_default()
                .push(row.clone());
        }

        let mut files = Vec::with_capacity(partitions.len());
        for (dir, partition_rows) in &partitions {
            let batch = T::to_batch(partition_rows).context(BatchBuildSnafu { table: T::NAME })?;
            let bytes = serialize_batch(&batch, self.compression)?;

            let path = if dir.is_empty() {
                format!("{}/part-00000.parquet", T::NAME)
            } else {
                format!("{}/{}/part-00000.parquet", T::NAME, dir)
            };

            debug!(
                table = T::NAME,
                path = %path,
                rows = partition_rows.len(),
                bytes = bytes.len(),
                "Serialized partition"
            );
            files.push(TableFile {
                path,
                bytes,
                rows: partition_rows.len(),
            });
        }

        Ok(files)
    }

    /// Delete the table's previous files and upload the new ones.
    async fn replace_table_files<T: Table>(&self, files: &[TableFile]) -> Result<(), WriteError> {
        let existing = self
            .storage
            .list_with_prefix(T::NAME)
            .await
            .context(PublishSnafu { table: T::NAME })?;
        for path in &existing {
            self.storage
                .delete(path)
                .await
                .context(PublishSnafu { table: T::NAME })?;
        }

        for file in files {
            self.storage
                .put(&Path::from(file.path.as_str()), file.bytes.clone())
                .await
                .context(PublishSnafu { table: T::NAME })?;
            emit!(ParquetFileWritten {
                table: T::NAME,
                bytes: file.bytes.len() as u64,
            });
        }

        Ok(())
    }
}

/// Hive-style partition directory for a row (empty for unpartitioned tables).
fn partition_dir<T: Table>(row: &T) -> String {
    T::PARTITION_COLUMNS
        .iter()
        .zip(row.partition_values())
        .map(|(column, value)| format!("{column}={value}"))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageProvider;
    use crate::tables::{SongRow, UserRow};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn writer() -> (TempDir, TableWriter) {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageProvider::for_url(temp_dir.path().to_str().unwrap())
            .await
            .unwrap();
        (
            temp_dir,
            TableWriter::new(Arc::new(storage), ParquetCompression::Snappy),
        )
    }

    fn song(song_id: &str, artist_id: &str, year: i32) -> SongRow {
        SongRow {
            song_id: song_id.to_string(),
            title: format!("title-{song_id}"),
            artist_id: artist_id.to_string(),
            year,
            duration: 200.0,
        }
    }

    #[test]
    fn test_partition_dir_layout() {
        let row = song("S1", "A1", 2005);
        assert_eq!(partition_dir(&row), "year=2005/artist_id=A1");

        let user = UserRow {
            userid: "15".into(),
            first_name: None,
            last_name: None,
            gender: None,
            level: None,
        };
        assert_eq!(partition_dir(&user), "");
    }

    #[tokio::test]
    async fn test_writes_one_file_per_partition() {
        let (dir, writer) = writer().await;
        let rows = vec![song("S1", "A1", 2005), song("S2", "A1", 2005), song("S3", "A2", 1999)];

        let summary = writer.write_table(&rows).await.unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.rows, 3);
        assert!(dir
            .path()
            .join("songs/year=2005/artist_id=A1/part-00000.parquet")
            .exists());
        assert!(dir
            .path()
            .join("songs/year=1999/artist_id=A2/part-00000.parquet")
            .exists());
    }

    #[tokio::test]
    async fn test_unpartitioned_table_writes_single_file() {
        let (dir, writer) = writer().await;
        let rows = vec![UserRow {
            userid: "15".into(),
            first_name: Some("Lily".into()),
            last_name: Some("Koch".into()),
            gender: Some("F".into()),
            level: Some("paid".into()),
        }];

        let summary = writer.write_table(&rows).await.unwrap();

        assert_eq!(summary.files, 1);
        assert!(dir.path().join("users/part-00000.parquet").exists());
    }

    #[tokio::test]
    async fn test_overwrite_removes_stale_partitions() {
        let (dir, writer) = writer().await;

        writer
            .write_table(&[song("S1", "A1", 2005), song("S2", "A2", 1999)])
            .await
            .unwrap();
        assert!(dir
            .path()
            .join("songs/year=1999/artist_id=A2/part-00000.parquet")
            .exists());

        // Second run no longer contains the 1999 song.
        writer.write_table(&[song("S1", "A1", 2005)]).await.unwrap();

        assert!(dir
            .path()
            .join("songs/year=2005/artist_id=A1/part-00000.parquet")
            .exists());
        assert!(!dir
            .path()
            .join("songs/year=1999/artist_id=A2/part-00000.parquet")
            .exists());
    }

    #[tokio::test]
    async fn test_empty_table_publishes_no_files() {
        let (dir, writer) = writer().await;

        let summary = writer.write_table::<SongRow>(&[]).await.unwrap();

        assert_eq!(summary.files, 0);
        assert!(!dir.path().join("songs").exists() || dir.path().join("songs").read_dir().unwrap().next().is_none());
    }
}

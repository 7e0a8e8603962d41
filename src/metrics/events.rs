//! Internal events for metrics emission.
//!
//! Each event struct represents a measurable occurrence in the job. Events
//! implement the `InternalEvent` trait which emits the corresponding counter
//! metric, labeled by dataset or table.

use metrics::counter;
use tracing::trace;

/// Trait for internal events that can be emitted as metrics.
pub trait InternalEvent {
    /// Emit this event as a metric.
    fn emit(self);
}

/// Event emitted when source records are read.
pub struct RecordsRead {
    pub count: u64,
    /// Source dataset label (`"songs"` or `"logs"`).
    pub dataset: &'static str,
}

impl InternalEvent for RecordsRead {
    fn emit(self) {
        trace!(count = self.count, dataset = self.dataset, "Records read");
        counter!("starlift_records_read_total", "dataset" => self.dataset).increment(self.count);
    }
}

/// Event emitted when malformed rows are dropped during the log transform.
pub struct RowsSkipped {
    pub count: u64,
}

impl InternalEvent for RowsSkipped {
    fn emit(self) {
        trace!(count = self.count, "Rows skipped");
        counter!("starlift_rows_skipped_total").increment(self.count);
    }
}

/// Event emitted when a table is published to storage.
pub struct TableWritten {
    pub table: &'static str,
    pub rows: u64,
    pub files: u64,
}

impl InternalEvent for TableWritten {
    fn emit(self) {
        trace!(
            table = self.table,
            rows = self.rows,
            files = self.files,
            "Table written"
        );
        counter!("starlift_table_rows_written_total", "table" => self.table).increment(self.rows);
        counter!("starlift_table_files_written_total", "table" => self.table)
            .increment(self.files);
    }
}

/// Event emitted when a Parquet file is uploaded.
pub struct ParquetFileWritten {
    pub table: &'static str,
    pub bytes: u64,
}

impl InternalEvent for ParquetFileWritten {
    fn emit(self) {
        trace!(table = self.table, bytes = self.bytes, "Parquet file written");
        counter!("starlift_bytes_written_total", "table" => self.table).increment(self.bytes);
    }
}

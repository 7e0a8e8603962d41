//! Parquet serialization.
//!
//! Serializes a record batch into an in-memory Parquet file; the table
//! writer uploads the finished bytes to storage.

use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use snafu::ResultExt;

use arrow::array::RecordBatch;

use crate::config::ParquetCompression;
use crate::error::{ParquetWriteSnafu, WriteError, WriterCreateSnafu};

/// Serialize a batch into Parquet file bytes.
pub fn serialize_batch(
    batch: &RecordBatch,
    compression: ParquetCompression,
) -> Result<Bytes, WriteError> {
    let properties = WriterProperties::builder()
        .set_compression(to_parquet_compression(compression))
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(properties))
        .context(WriterCreateSnafu)?;

    writer.write(batch).context(ParquetWriteSnafu)?;
    writer.close().context(ParquetWriteSnafu)?;

    Ok(Bytes::from(buffer))
}

fn to_parquet_compression(compression: ParquetCompression) -> Compression {
    match compression {
        ParquetCompression::Uncompressed => Compression::UNCOMPRESSED,
        ParquetCompression::Snappy => Compression::SNAPPY,
        ParquetCompression::Gzip => Compression::GZIP(GzipLevel::default()),
        ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
        ParquetCompression::Lz4 => Compression::LZ4,
    }
}

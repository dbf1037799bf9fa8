pub mod batch;
pub mod parquet_writer;

pub use batch::{bronze_to_batch, gold_to_batch, silver_to_batch};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

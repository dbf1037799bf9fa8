pub mod batch_reader;
pub mod parquet_reader;

pub use batch_reader::{BatchReader, RawBatch};
pub use parquet_reader::{gold_from_batch, observations_from_batch, silver_from_batch, ParquetReader};

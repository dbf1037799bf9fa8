/// Raw measurement columns
pub const COL_DATE: &str = "date";
pub const COL_MEANTEMP: &str = "meantemp";
pub const COL_HUMIDITY: &str = "humidity";
pub const COL_WIND_SPEED: &str = "wind_speed";
pub const COL_MEANPRESSURE: &str = "meanpressure";

/// Provenance columns attached at ingestion
pub const COL_SOURCE_PATH: &str = "source_path";
pub const COL_SOURCE_SHA: &str = "source_sha";
pub const COL_GIT_COMMIT_HASH: &str = "git_commit_hash";
pub const COL_INGESTED_AT: &str = "ingested_at";

/// Gold feature columns (next-day temperature)
pub const COL_MEANTEMP_TODAY: &str = "meantemp_today";
pub const COL_MEANTEMP_LAG_1: &str = "meantemp_lag_1";
pub const COL_MEANTEMP_LAG_7: &str = "meantemp_lag_7";
pub const COL_MEANTEMP_ROLL_7: &str = "meantemp_roll_7";
pub const COL_HUMIDITY_TODAY: &str = "humidity_today";
pub const COL_HUMIDITY_LAG_1: &str = "humidity_lag_1";
pub const COL_HUMIDITY_ROLL_7: &str = "humidity_roll_7";
pub const COL_MEANPRESSURE_TODAY: &str = "meanpressure_today";
pub const COL_MEANPRESSURE_LAG_1: &str = "meanpressure_lag_1";
pub const COL_MEANPRESSURE_ROLL_7: &str = "meanpressure_roll_7";
pub const COL_TARGET: &str = "target";

/// Directory names
pub const DATA_DIR: &str = "data";
pub const INPUT_DIR: &str = "input";
pub const BRONZE_DIR: &str = "bronze";
pub const SILVER_DIR: &str = "silver";
pub const GOLD_DIR: &str = "gold";

/// File names
pub const BRONZE_BATCH_PREFIX: &str = "batch_";
pub const SILVER_FILE: &str = "silver.parquet";

/// Feature windows
pub const LAG_SHORT: usize = 1;
pub const LAG_LONG: usize = 7;
pub const ROLLING_WINDOW: usize = 7;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_READ_BATCH_SIZE: usize = 8192;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

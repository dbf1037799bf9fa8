pub mod bronze_ingestor;
pub mod gold_builder;
pub mod pipeline;
pub mod schema_validator;
pub mod silver_builder;

pub use bronze_ingestor::BronzeIngestor;
pub use gold_builder::{build_gold, GoldBuilder};
pub use pipeline::{Pipeline, RunSummary, StageOutput};
pub use schema_validator::{check_date_sequence, SchemaValidator, SchemaViolation, Tier, ValidationRule};
pub use silver_builder::{build_silver, interpolate_gaps, ColumnReport, SilverBuilder, SilverReport};

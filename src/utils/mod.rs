pub mod checksum;
pub mod constants;
pub mod filename;
pub mod progress;

pub use checksum::{git_revision, sha256_file};
pub use constants::*;
pub use filename::{batch_id_from_path, list_bronze_batches, validate_batch_id};
pub use progress::ProgressReporter;

pub mod bronze;
pub mod gold;
pub mod measure;
pub mod observation;
pub mod schema;
pub mod silver;

pub use bronze::{BronzeBatch, Provenance};
pub use gold::{GoldFeatureSet, GoldRecord};
pub use measure::Measure;
pub use observation::{parse_calendar_day, RawObservation};
pub use silver::SilverRecord;

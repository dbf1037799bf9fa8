use std::path::{Path, PathBuf};

use crate::utils::constants::{
    BRONZE_BATCH_PREFIX, BRONZE_DIR, DATA_DIR, GOLD_DIR, INPUT_DIR, SILVER_DIR, SILVER_FILE,
};

/// Fixed storage layout of every tier, relative to a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub input: PathBuf,
    pub bronze: PathBuf,
    pub silver: PathBuf,
    pub gold: PathBuf,
}

impl ProjectPaths {
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data = root.join(DATA_DIR);
        Self {
            input: data.join(INPUT_DIR),
            bronze: data.join(BRONZE_DIR),
            silver: data.join(SILVER_DIR),
            gold: data.join(GOLD_DIR),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `data/input/batch_{id}.csv`
    pub fn input_batch(&self, batch_id: &str) -> PathBuf {
        self.input
            .join(format!("{}{}.csv", BRONZE_BATCH_PREFIX, batch_id))
    }

    /// `data/bronze/batch_{id}.parquet`
    pub fn bronze_batch(&self, batch_id: &str) -> PathBuf {
        self.bronze
            .join(format!("{}{}.parquet", BRONZE_BATCH_PREFIX, batch_id))
    }

    /// `data/silver/silver.parquet`
    pub fn silver_table(&self) -> PathBuf {
        self.silver.join(SILVER_FILE)
    }

    /// `data/gold/{name}.parquet`
    pub fn gold_table(&self, name: &str) -> PathBuf {
        self.gold.join(format!("{}.parquet", name))
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::under(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = ProjectPaths::under("/srv/weather");

        assert_eq!(paths.input, PathBuf::from("/srv/weather/data/input"));
        assert_eq!(paths.bronze, PathBuf::from("/srv/weather/data/bronze"));
        assert_eq!(
            paths.input_batch("01"),
            PathBuf::from("/srv/weather/data/input/batch_01.csv")
        );
        assert_eq!(
            paths.bronze_batch("01"),
            PathBuf::from("/srv/weather/data/bronze/batch_01.parquet")
        );
        assert_eq!(
            paths.silver_table(),
            PathBuf::from("/srv/weather/data/silver/silver.parquet")
        );
        assert_eq!(
            paths.gold_table("next_day_temp"),
            PathBuf::from("/srv/weather/data/gold/next_day_temp.parquet")
        );
    }
}

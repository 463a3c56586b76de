//! Persistence of the canonical dataset as a flat CSV file

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::types::{Column, Dataset, PlayerRow};

/// Owns the canonical file. Every save overwrites it wholesale.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// Write the dataset in canonical column order, creating parent directories
    pub fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|source| StoreError::Io { path: parent.display().to_string(), source })?;
        }

        let csv_error = |source| StoreError::Csv { path: self.display_path(), source };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(csv_error)?;

        writer.write_record(Column::ALL.iter().map(|c| c.header())).map_err(csv_error)?;
        for row in dataset.iter() {
            writer.serialize(row).map_err(csv_error)?;
        }
        writer
            .flush()
            .map_err(|source| StoreError::Io { path: self.display_path(), source })?;

        info!("Saved combined data to {} ({} players)", self.path.display(), dataset.len());
        Ok(())
    }

    /// Read the canonical file, failing on a missing or unreadable file
    pub fn try_load(&self) -> Result<Dataset, StoreError> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|source| StoreError::Csv { path: self.display_path(), source })?;

        let mut rows = Vec::new();
        for (line, record) in reader.deserialize::<PlayerRow>().enumerate() {
            match record {
                Ok(row) => rows.push(row),
                Err(e) => warn!("Skipping unreadable row {} in {}: {}", line + 1, self.path.display(), e),
            }
        }

        Ok(Dataset::new(rows))
    }

    /// Read the canonical file; a missing or unreadable file is an empty dataset
    pub fn load(&self) -> Dataset {
        if !self.path.exists() {
            warn!("Data file {} not found", self.path.display());
            return Dataset::empty();
        }

        match self.try_load() {
            Ok(dataset) => {
                info!("Loaded {} players from {}", dataset.len(), self.path.display());
                dataset
            }
            Err(e) => {
                warn!("Error loading data: {}", e);
                Dataset::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{generate, SyntheticProfile};
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load_preserves_rows() {
        let dir = TempDir::new().unwrap();
        let store = DatasetStore::new(dir.path().join("data").join("nba_combined_latest.csv"));
        let dataset = generate(SyntheticProfile::Tiered);

        store.save(&dataset).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_header_is_canonical() {
        let dir = TempDir::new().unwrap();
        let store = DatasetStore::new(dir.path().join("out.csv"));
        store.save(&Dataset::empty()).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents.trim_end(),
            "PLAYER_ID,PLAYER_NAME,TEAM_ABBREVIATION,AGE,GP,MIN,PTS,REB,AST,STL,BLK,TOV,FG_PCT,FG3_PCT,FT_PCT,DREB,PF,EFF"
        );
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_file() {
        let dir = TempDir::new().unwrap();
        let store = DatasetStore::new(dir.path().join("out.csv"));

        store.save(&generate(SyntheticProfile::Basic)).unwrap();
        let smaller: Dataset = generate(SyntheticProfile::Basic).into_rows().into_iter().take(3).collect();
        store.save(&smaller).unwrap();

        assert_eq!(store.load().len(), 3);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = DatasetStore::new(dir.path().join("missing.csv"));

        assert!(store.load().is_empty());
        assert!(store.try_load().is_err());
    }

    #[test]
    fn test_load_tolerates_extra_and_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.csv");
        fs::write(
            &path,
            "PLAYER_NAME,TEAM_ABBREVIATION,PTS,FG_PCT,NICKNAME\nNikola Jokic,DEN,26.4,,Joker\n",
        )
        .unwrap();

        let loaded = DatasetStore::new(&path).load();
        let jokic = loaded.lookup("jokic").unwrap();
        assert_eq!(jokic.points, 26.4);
        assert_eq!(jokic.fg_pct, 0.0);
        assert_eq!(jokic.games_played, 0);
    }
}

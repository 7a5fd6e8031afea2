//! The persisted asset table.
//!
//! One file holds the ordered rows of the last export. The container is picked
//! from the file extension; every backend yields the same `Vec<AssetRow>`.

pub mod csv_file;
pub mod json_file;
pub mod sqlite;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::AssetIntelError;
use crate::models::AssetRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Csv,
    Json,
    JsonLines,
    Sqlite,
}

impl StoreFormat {
    pub fn from_path(path: &Path) -> Result<Self, AssetIntelError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(StoreFormat::Csv),
            "json" => Ok(StoreFormat::Json),
            "jsonl" | "ndjson" => Ok(StoreFormat::JsonLines),
            "db" | "sqlite" | "sqlite3" => Ok(StoreFormat::Sqlite),
            other => Err(AssetIntelError::InvalidArgument(format!(
                "unsupported asset store type '{}' for {} (use .csv, .json, .jsonl, .ndjson, .db, .sqlite)",
                other,
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetStore {
    path: PathBuf,
    format: StoreFormat,
}

impl AssetStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, AssetIntelError> {
        let path = path.into();
        let format = StoreFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replace the store with `rows`.
    ///
    /// Rows are written to a temporary file next to the target and renamed
    /// over it only once complete, so a failed save leaves the previous file
    /// as it was.
    pub fn save(&self, rows: &[AssetRow]) -> Result<(), AssetIntelError> {
        if let Some(row) = rows.iter().find(|r| r.id.trim().is_empty()) {
            return Err(AssetIntelError::Internal(format!(
                "refusing to persist a row without id (hostname '{}')",
                row.hostname
            )));
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".asset-store-")
            .tempfile_in(&dir)?;

        match self.format {
            StoreFormat::Csv => csv_file::write(tmp.as_file_mut(), rows)?,
            StoreFormat::Json => json_file::write(tmp.as_file_mut(), rows)?,
            StoreFormat::JsonLines => json_file::write_lines(tmp.as_file_mut(), rows)?,
            StoreFormat::Sqlite => sqlite::write(tmp.path(), rows)?,
        }
        tmp.as_file().sync_all()?;

        tmp.persist(&self.path).map_err(|e| AssetIntelError::Io(e.error))?;
        info!(path = %self.path.display(), rows = rows.len(), "Asset store written");
        Ok(())
    }

    /// Read every row in file order. Any failure (missing file, unreadable
    /// container, a row without id) is reported as `StoreUnavailable`.
    pub fn load(&self) -> Result<Vec<AssetRow>, AssetIntelError> {
        if !self.exists() {
            return Err(AssetIntelError::store_unavailable(&self.path, "file does not exist"));
        }

        let rows = self
            .read_rows()
            .map_err(|e| AssetIntelError::store_unavailable(&self.path, e))?;

        if let Some(position) = rows.iter().position(|r| r.id.trim().is_empty()) {
            return Err(AssetIntelError::store_unavailable(
                &self.path,
                format!("row {} has an empty id", position + 1),
            ));
        }

        debug!(path = %self.path.display(), rows = rows.len(), "Asset store loaded");
        Ok(rows)
    }

    fn read_rows(&self) -> Result<Vec<AssetRow>, AssetIntelError> {
        match self.format {
            StoreFormat::Csv => csv_file::read(File::open(&self.path)?),
            StoreFormat::Json => json_file::read(&std::fs::read_to_string(&self.path)?),
            StoreFormat::JsonLines => json_file::read_lines(BufReader::new(File::open(&self.path)?)),
            StoreFormat::Sqlite => sqlite::read(&self.path),
        }
    }
}

/// Convenience for callers holding only a path.
pub fn load(path: &Path) -> Result<Vec<AssetRow>, AssetIntelError> {
    AssetStore::new(path)
        .map_err(|e| AssetIntelError::store_unavailable(path, e))?
        .load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;
    use tempfile::TempDir;

    fn sample_rows() -> Vec<AssetRow> {
        let mut dc = AssetRow::with_id("a-1");
        dc.hostname = "se-dc1".into();
        dc.ipv4 = vec!["10.0.0.1".into()];
        dc.exposure_score = Some(773.0);
        dc.tags = vec![Tag::new("Location", "London")];
        let mut web = AssetRow::with_id("a-2");
        web.hostname = "web-01".into();
        vec![dc, web]
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(StoreFormat::from_path(Path::new("assets.CSV")).unwrap(), StoreFormat::Csv);
        assert_eq!(StoreFormat::from_path(Path::new("out/assets.ndjson")).unwrap(), StoreFormat::JsonLines);
        assert_eq!(StoreFormat::from_path(Path::new("assets.sqlite3")).unwrap(), StoreFormat::Sqlite);
        assert!(matches!(
            StoreFormat::from_path(Path::new("assets.xlsx")),
            Err(AssetIntelError::InvalidArgument(_))
        ));
        assert!(StoreFormat::from_path(Path::new("assets")).is_err());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        let err = AssetStore::new(&path).unwrap().load().unwrap_err();
        match &err {
            AssetIntelError::StoreUnavailable { path: p, .. } => assert!(p.ends_with("missing.csv")),
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_every_backend_loads_what_it_saved() {
        let dir = TempDir::new().unwrap();
        for name in ["assets.csv", "assets.json", "assets.jsonl", "assets.db"] {
            let store = AssetStore::new(dir.path().join(name)).unwrap();
            store.save(&sample_rows()).unwrap();
            assert_eq!(store.load().unwrap(), sample_rows(), "backend {}", name);
        }
    }

    #[test]
    fn test_save_overwrites_instead_of_appending() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().join("assets.csv")).unwrap();
        store.save(&sample_rows()).unwrap();
        store.save(&sample_rows()[..1]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let err = AssetStore::new(&path).unwrap().load().unwrap_err();
        assert!(matches!(err, AssetIntelError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_row_without_id_makes_file_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.jsonl");
        std::fs::write(&path, "{\"id\":\"a-1\"}\n{\"id\":\"\"}\n").unwrap();
        let err = AssetStore::new(&path).unwrap().load().unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().join("assets.json")).unwrap();
        store.save(&sample_rows()).unwrap();

        let bad = vec![AssetRow::with_id("")];
        assert!(store.save(&bad).is_err());
        assert_eq!(store.load().unwrap(), sample_rows());

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".asset-store-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failed_rename_discards_temp_file() {
        let dir = TempDir::new().unwrap();
        // The target name is taken by a non-empty directory, so the final
        // rename fails after the rows were fully written.
        let target = dir.path().join("assets.json");
        std::fs::create_dir(&target).unwrap();
        let previous = AssetStore::new(target.join("previous.json")).unwrap();
        previous.save(&sample_rows()).unwrap();

        let store = AssetStore::new(&target).unwrap();
        let err = store.save(&sample_rows()[..1]).unwrap_err();
        assert!(matches!(err, AssetIntelError::Io(_)));

        assert!(target.is_dir());
        assert_eq!(previous.load().unwrap(), sample_rows());
        for scanned in [dir.path(), target.as_path()] {
            let leftovers: Vec<_> = std::fs::read_dir(scanned)
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with(".asset-store-"))
                .collect();
            assert!(leftovers.is_empty(), "temp file left in {}", scanned.display());
        }
    }

    #[test]
    fn test_load_by_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.jsonl");
        AssetStore::new(&path).unwrap().save(&sample_rows()).unwrap();
        assert_eq!(load(&path).unwrap(), sample_rows());

        let err = load(&dir.path().join("assets.xlsx")).unwrap_err();
        match err {
            AssetIntelError::StoreUnavailable { path, .. } => assert!(path.ends_with("assets.xlsx")),
            other => panic!("unexpected error: {}", other),
        }
    }
}

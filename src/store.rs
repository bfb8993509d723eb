use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::fuel::FuelMarker;

pub const MARKER_FILE: &str = "last_petrol_calc.json";
pub const LOG_FILE: &str = "Benzinverbrauch-Log.txt";

pub trait MarkerStore {
    /// Returns `None` when no marker has been saved yet.
    fn load(&self) -> Result<Option<FuelMarker>>;
    fn save(&mut self, marker: &FuelMarker) -> Result<()>;
}

pub trait LogSink {
    fn append(&mut self, line: &str) -> Result<()>;
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(MARKER_FILE))
    }
}

impl MarkerStore for JsonFileStore {
    fn load(&self) -> Result<Option<FuelMarker>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        match serde_json::from_str(&data) {
            Ok(marker) => Ok(Some(marker)),
            Err(err) => {
                // A corrupt marker only costs one extra log line.
                log::warn!("ignoring unreadable marker {}: {}", self.path.display(), err);
                Ok(None)
            }
        }
    }

    fn save(&mut self, marker: &FuelMarker) -> Result<()> {
        let data = serde_json::to_string(marker)?;
        fs::write(&self.path, data).with_context(|| format!("writing {}", self.path.display()))
    }
}

#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(LOG_FILE))
    }
}

impl LogSink for FileLog {
    fn append(&mut self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        writeln!(file, "{}", line).with_context(|| format!("appending to {}", self.path.display()))
    }
}

/// Keeps everything in memory, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub marker: Option<FuelMarker>,
    pub lines: Vec<String>,
}

impl MarkerStore for MemoryStore {
    fn load(&self) -> Result<Option<FuelMarker>> {
        Ok(self.marker.clone())
    }
    fn save(&mut self, marker: &FuelMarker) -> Result<()> {
        self.marker = Some(marker.clone());
        Ok(())
    }
}

impl LogSink for MemoryStore {
    fn append(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuel::{FuelInput, DEFAULT_PARAMS};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_marker() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert_eq!(None, store.load().unwrap());
    }

    #[test]
    fn test_marker_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(dir.path());
        let input = FuelInput::parse(DEFAULT_PARAMS).unwrap();
        let marker = FuelMarker::new(&input, Utc.with_ymd_and_hms(2025, 8, 19, 10, 15, 0).unwrap());
        store.save(&marker).unwrap();
        assert_eq!(Some(marker), store.load().unwrap());
        assert!(dir.path().join(MARKER_FILE).exists());
    }

    #[test]
    fn test_corrupt_marker() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MARKER_FILE), "{not json").unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert_eq!(None, store.load().unwrap());
    }

    #[test]
    fn test_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = FileLog::in_dir(dir.path());
        log.append("first").unwrap();
        log.append("second").unwrap();
        let content = fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert_eq!("first\nsecond\n", content);
    }
}

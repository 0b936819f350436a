//! Record loading utilities
//!
//! Generic helpers for reading YAML records from a project directory.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::project::{Project, RecordKind};

/// A file that could not be read or parsed
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Load a single record file
pub fn load_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_yml::from_str::<T>(&content).map_err(|e| e.to_string())
}

/// Load all records of one kind
///
/// Files that fail to parse are skipped with a warning and returned
/// alongside the records.
pub fn load_all<T: DeserializeOwned + 'static>(project: &Project, kind: RecordKind) -> (Vec<T>, Vec<SkippedFile>) {
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for path in project.iter_record_files(kind) {
        match load_file::<T>(&path) {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::warn!("Skipping {}: {}", path.display(), reason);
                skipped.push(SkippedFile { path, reason });
            }
        }
    }

    log::debug!(
        "Loaded {} {} record(s), skipped {}",
        records.len(),
        kind.directory(),
        skipped.len()
    );
    (records, skipped)
}

/// Find a record file by stem (exact, case-insensitive)
pub fn find_record_file(project: &Project, kind: RecordKind, id: &str) -> Option<PathBuf> {
    let wanted = id.trim().to_lowercase();
    project.iter_record_files(kind).find(|path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.to_lowercase() == wanted)
    })
}

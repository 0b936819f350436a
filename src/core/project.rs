//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Record kinds stored one YAML file each under the project root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Component,
    Client,
    Override,
    Material,
    Link,
    Bom,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Component,
        RecordKind::Client,
        RecordKind::Override,
        RecordKind::Material,
        RecordKind::Link,
        RecordKind::Bom,
    ];

    /// Directory name relative to the project root
    pub fn directory(self) -> &'static str {
        match self {
            RecordKind::Component => "components",
            RecordKind::Client => "clients",
            RecordKind::Override => "overrides",
            RecordKind::Material => "materials",
            RecordKind::Link => "links",
            RecordKind::Bom => "boms",
        }
    }
}

/// Represents an SRT project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .srt/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(".srt").is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let srt_dir = root.join(".srt");
        if srt_dir.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }
        Self::write_layout(&root)?;
        Ok(Self { root })
    }

    /// Initialize even if .srt/ exists, rewriting the default config
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_layout(&root)?;
        Ok(Self { root })
    }

    fn write_layout(root: &Path) -> Result<(), ProjectError> {
        let srt_dir = root.join(".srt");
        std::fs::create_dir_all(&srt_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(srt_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        for kind in RecordKind::ALL {
            std::fs::create_dir_all(root.join(kind.directory()))
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }
        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# SRT Project Configuration

# Default output format (auto, yaml, tsv, json, csv, md)
# default_format: auto

# Boards per week when neither the BOM nor the client gives a run rate
# run_rate: 5000

# Scoring calibration. Only the keys you set are changed.
# scoring:
#   thresholds:
#     high: 55
#     medium: 30
#   weights:
#     geographic: 25
#     single_source: 20
#     lead_time: 15
#     buffer_stock: 15
#     dependency: 10
#     proprietary: 10
#     certification: 5
#   buffer:
#     critical_coverage: 1.0
#     safe_coverage: 1.5
#   chain:
#     decay: 0.85
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .srt configuration directory
    pub fn srt_dir(&self) -> PathBuf {
        self.root.join(".srt")
    }

    pub fn config_path(&self) -> PathBuf {
        self.srt_dir().join("config.yaml")
    }

    /// Directory holding one record kind
    pub fn record_dir(&self, kind: RecordKind) -> PathBuf {
        self.root.join(kind.directory())
    }

    /// Iterate all record files of a kind, nested directories included
    pub fn iter_record_files(&self, kind: RecordKind) -> impl Iterator<Item = PathBuf> {
        walkdir::WalkDir::new(self.record_dir(kind))
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
            })
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not an SRT project (searched from {searched_from:?}). Run 'srt init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("SRT project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

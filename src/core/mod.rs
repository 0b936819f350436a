//! Core module - project, configuration and record access

pub mod config;
pub mod loader;
pub mod project;
pub mod store;

pub use config::Config;
pub use project::{Project, ProjectError, RecordKind};
pub use store::{load_bom, normalize_key, RecordStore, Snapshot, StoreError};

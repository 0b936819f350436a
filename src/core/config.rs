//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::config::{ConfigError, ScoringConfig};
use crate::core::Project;

/// SRT configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Boards per week when neither request nor client gives one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_rate: Option<f64>,

    /// Scoring calibration; missing keys keep their defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Self {
        // 1. Built-in defaults (already in Default impl)
        let mut config = Config::default();

        // 2. Global user config (~/.config/srt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.srt/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(format) = std::env::var("SRT_FORMAT") {
            config.default_format = Some(format);
        }
        if let Ok(rate) = std::env::var("SRT_RUN_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(r) if r >= 0.0 => config.run_rate = Some(r),
                _ => log::warn!("Ignoring SRT_RUN_RATE='{}': not a non-negative number", rate),
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        // an empty or all-comment file holds no document at all
        let blank = contents.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Some(Config::default());
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "srt").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.run_rate.is_some() {
            self.run_rate = other.run_rate;
        }
        if other.scoring.is_some() {
            self.scoring = other.scoring;
        }
    }

    /// Effective scoring configuration, validated
    pub fn scoring(&self) -> Result<ScoringConfig, ConfigError> {
        let mut scoring = self.scoring.clone().unwrap_or_default();
        if let Some(rate) = self.run_rate {
            scoring.default_run_rate = rate;
        }
        scoring.validate()?;
        Ok(scoring)
    }
}

//! Shared helper functions for CLI commands
//!
//! Project discovery, configuration loading and output formatting used by
//! every analysis command.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::analysis::{BatchRequest, RiskLevel, ScoringConfig};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{load_bom, Config, Project, Snapshot};
use crate::entities::Bom;

/// Everything a command needs to score against a project
pub struct Session {
    pub project: Project,
    pub config: Config,
    pub scoring: ScoringConfig,
    pub store: Snapshot,
    pub format: OutputFormat,
}

/// BOM selection shared by the BOM-level commands
#[derive(clap::Args, Debug, Clone)]
pub struct BomInput {
    /// BOM id (file stem under boms/), BOM YAML file, or CSV file
    pub bom: String,

    /// Client whose overrides apply (overrides the BOM's client)
    #[arg(long, short = 'c')]
    pub client: Option<String>,

    /// Boards per week (overrides the BOM, client and config)
    #[arg(long)]
    pub run_rate: Option<f64>,
}

impl BomInput {
    /// Resolve the BOM and turn it into a scoring request
    pub fn request(&self, project: &Project) -> Result<(Bom, BatchRequest)> {
        let bom = load_bom(Some(project), &self.bom).map_err(|e| miette::miette!("{}", e))?;
        let mut request = BatchRequest::from_bom(&bom);
        if self.client.is_some() {
            request.client_id = self.client.clone();
        }
        if let Some(rate) = self.run_rate {
            if rate < 0.0 {
                return Err(miette::miette!("--run-rate must not be negative"));
            }
            request.run_rate = Some(rate);
        }
        Ok((bom, request))
    }
}

/// Find the project from `--project` or by walking up from the working directory
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let project = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    project.map_err(|e| miette::miette!("{}", e))
}

/// Open the project, load its configuration and take a record snapshot
pub fn open_session(global: &GlobalOpts) -> Result<Session> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project));
    let scoring = config
        .scoring()
        .map_err(|e| miette::miette!("Invalid scoring configuration: {}", e))?;
    let store = Snapshot::load(&project);
    if !store.skipped().is_empty() && !global.quiet {
        eprintln!(
            "{} {} record file(s) could not be parsed and were skipped (see -v)",
            style("!").yellow(),
            store.skipped().len()
        );
    }
    let format = resolve_format(global, &config);
    Ok(Session {
        project,
        config,
        scoring,
        store,
        format,
    })
}

/// `--format` wins; otherwise the configured default, otherwise auto
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    match config.default_format.as_deref().map(str::parse::<OutputFormat>) {
        Some(Ok(format)) => format,
        Some(Err(_)) => {
            log::warn!(
                "Ignoring unknown default_format '{}'",
                config.default_format.as_deref().unwrap_or_default()
            );
            OutputFormat::Auto
        }
        None => OutputFormat::Auto,
    }
}

/// Print a value as YAML or JSON; returns false for the tabular formats
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Coloured level label
pub fn styled_level(level: RiskLevel) -> String {
    match level {
        RiskLevel::Alto => style(level).red().bold().to_string(),
        RiskLevel::Medio => style(level).yellow().to_string(),
        RiskLevel::Basso => style(level).green().to_string(),
    }
}

/// Format an optional number, "-" when absent
pub fn format_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

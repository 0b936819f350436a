//! `srt config` command - Configuration inspection
//!
//! Shows the effective, layered configuration and where it comes from.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::analysis::ScoringConfig;
use crate::cli::helpers::{open_project, print_structured, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path(PathArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value (dotted, e.g. scoring.thresholds.high)
    pub key: Option<String>,

    /// Show only project-level config
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global (user) config
    #[arg(long = "global-only")]
    pub global_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Show only project config path
    #[arg(long = "project-only")]
    pub project_only: bool,

    /// Show only global config path
    #[arg(long = "global-only")]
    pub global_only: bool,
}

/// The configuration as the engines see it
#[derive(Debug, Serialize)]
struct EffectiveConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    default_format: Option<String>,
    scoring: ScoringConfig,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    // config commands also work outside a project
    let project = open_project(global).ok();
    match cmd {
        ConfigCommands::Show(args) => run_show(args, project.as_ref(), global),
        ConfigCommands::Path(args) => run_path(args, project.as_ref()),
    }
}

fn run_show(args: ShowArgs, project: Option<&Project>, global: &GlobalOpts) -> Result<()> {
    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }
    if args.project_only {
        let path = project_config_path(project)?;
        return show_file("Project config:", path);
    }
    if args.global_only {
        return show_file("Global config:", global_config_path()?);
    }

    let config = Config::load(project);
    let effective = EffectiveConfig {
        default_format: config.default_format.clone(),
        scoring: config
            .scoring()
            .map_err(|e| miette::miette!("Invalid scoring configuration: {}", e))?,
    };

    if let Some(key) = &args.key {
        let root = serde_yml::to_value(&effective).into_diagnostic()?;
        let value = lookup(&root, key)
            .ok_or_else(|| miette::miette!("Key '{}' is not set", key))?;
        match value {
            serde_yml::Value::String(s) => println!("{}", s),
            serde_yml::Value::Number(n) => println!("{}", n),
            serde_yml::Value::Bool(b) => println!("{}", b),
            other => print!("{}", serde_yml::to_string(other).into_diagnostic()?),
        }
        return Ok(());
    }

    let format = match resolve_format(global, &config) {
        OutputFormat::Json => OutputFormat::Json,
        _ => OutputFormat::Yaml,
    };
    if !global.quiet && format == OutputFormat::Yaml {
        println!("# Effective configuration");
        println!("# Sources (in priority order): environment (SRT_FORMAT, SRT_RUN_RATE),");
        println!("# project .srt/config.yaml, global config, built-in defaults");
    }
    print_structured(&effective, format)?;
    Ok(())
}

fn run_path(args: PathArgs, project: Option<&Project>) -> Result<()> {
    if args.project_only && args.global_only {
        return Err(miette::miette!(
            "Cannot specify both --project-only and --global-only"
        ));
    }

    if args.project_only {
        println!("{}", project_config_path(project)?.display());
    } else if args.global_only {
        println!("{}", global_config_path()?.display());
    } else {
        let global_path = global_config_path()?;

        println!("{}", style("Configuration file paths:").bold());
        println!();
        println!("  {} {}", style("Global:").cyan(), global_path.display());
        print_exists(global_path.exists(), 9);

        println!();
        match project {
            Some(project) => {
                let path = project.config_path();
                println!("  {} {}", style("Project:").cyan(), path.display());
                print_exists(path.exists(), 10);
            }
            None => println!(
                "  {} {}",
                style("Project:").cyan(),
                style("(not in an SRT project)").dim()
            ),
        }
    }

    Ok(())
}

fn print_exists(exists: bool, indent: usize) {
    let label = if exists {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("{:indent$}{}", "", label, indent = indent);
}

fn global_config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))
}

fn project_config_path(project: Option<&Project>) -> Result<PathBuf> {
    project
        .map(Project::config_path)
        .ok_or_else(|| miette::miette!("Not in an SRT project. Run 'srt init' to create one."))
}

fn show_file(label: &str, path: PathBuf) -> Result<()> {
    println!("{} {}", style(label).bold(), style(path.display()).dim());
    println!();
    if path.exists() {
        let content = fs::read_to_string(&path).into_diagnostic()?;
        print!("{}", content);
    } else {
        println!("{}", style("(not created)").dim());
    }
    Ok(())
}

/// Follow a dotted key through nested mappings
fn lookup<'v>(root: &'v serde_yml::Value, key: &str) -> Option<&'v serde_yml::Value> {
    key.split('.').try_fold(root, |current, part| match current {
        serde_yml::Value::Mapping(map) => map.get(part),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_dotted_key() {
        let effective = EffectiveConfig {
            default_format: Some("json".to_string()),
            scoring: ScoringConfig::default(),
        };
        let root = serde_yml::to_value(&effective).unwrap();
        assert_eq!(
            lookup(&root, "scoring.thresholds.high").and_then(|v| v.as_f64()),
            Some(55.0)
        );
        assert_eq!(
            lookup(&root, "default_format").and_then(|v| v.as_str()),
            Some("json")
        );
        assert!(lookup(&root, "scoring.nope").is_none());
        assert!(lookup(&root, "default_format.deeper").is_none());
    }
}

//! `srt init` command - Initialize a new SRT project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::{Project, ProjectError, RecordKind};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .srt/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            println!(
                "{} Initialized SRT project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created project structure:");
            print_structure(&project);
            println!();
            println!("Next steps:");
            println!(
                "  {} Add component records as YAML files",
                style("components/").yellow()
            );
            println!(
                "  {} Score a part",
                style("srt score <PART_NUMBER>").yellow()
            );
            println!(
                "  {} Score a BOM from boms/ or a CSV file",
                style("srt bom <BOM>").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} SRT project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("srt init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(project: &Project) {
    println!("  {}", style(".srt/config.yaml").dim());
    for kind in RecordKind::ALL {
        if project.record_dir(kind).exists() {
            println!("  {}", style(format!("{}/", kind.directory())).dim());
        }
    }
}

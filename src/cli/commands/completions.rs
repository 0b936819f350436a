//! Shell completion generation
//!
//! Generates shell completion scripts for bash, zsh, fish, and PowerShell.
//!
//! # Usage
//!
//! ```bash
//! # Bash - add to ~/.bashrc
//! source <(srt completions bash)
//!
//! # Zsh - add to ~/.zshrc
//! source <(srt completions zsh)
//!
//! # Fish
//! srt completions fish -o ~/.config/fish/completions/srt.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path).into_diagnostic()?),
        None => Box::new(io::stdout()),
    };
    generate(args.shell, &mut cmd, "srt", &mut out);
    out.flush().into_diagnostic()
}

use clap::Parser;
use env_logger::Env;
use miette::Result;
use srt::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    // RUST_LOG wins over the flags
    let log_level = if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Init(args) => srt::cli::commands::init::run(args),
        Commands::Score(args) => srt::cli::commands::score::run(args, &global),
        Commands::Bom(args) => srt::cli::commands::bom::run(args, &global),
        Commands::Deps(args) => srt::cli::commands::deps::run(args, &global),
        Commands::Tier2(args) => srt::cli::commands::tier2::run(args, &global),
        Commands::WhatIf(args) => srt::cli::commands::whatif::run(args, &global),
        Commands::Config(cmd) => srt::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => srt::cli::commands::completions::run(args),
    }
}

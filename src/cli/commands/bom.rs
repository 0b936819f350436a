//! `srt bom` command - batch scoring with dependency propagation

use console::style;
use miette::Result;

use crate::analysis::{BatchOutcome, BatchScorer, BomAnalysis};
use crate::cli::helpers::{open_session, print_structured, styled_level, BomInput};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct BomArgs {
    #[command(flatten)]
    pub input: BomInput,

    /// Number of riskiest components to list
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

pub fn run(args: BomArgs, global: &GlobalOpts) -> Result<()> {
    let session = open_session(global)?;
    let (bom, request) = args.input.request(&session.project)?;
    let scorer = BatchScorer::new(&session.scoring, &session.store);
    let analysis = scorer.analyze(&request, args.top);

    if print_structured(&analysis, session.format)? {
        return Ok(());
    }

    let table = line_table(&analysis);
    if session.format != OutputFormat::Auto {
        print!("{}", table.render(session.format));
        return Ok(());
    }

    let title = bom.name.as_deref().unwrap_or(&bom.id);
    let s = &analysis.summary;
    println!(
        "{} {:.1} {}",
        style(title).cyan().bold(),
        s.bom_score,
        styled_level(s.bom_level)
    );
    if global.quiet {
        return Ok(());
    }
    println!(
        "{} component(s), {} not found, run rate {}/week",
        s.component_count, s.not_found, analysis.run_rate
    );
    println!(
        "ALTO {}  MEDIO {}  BASSO {}  |  mean {:.1}  max chain {:.1}  |  {} SPOF(s)",
        s.distribution.alto,
        s.distribution.medio,
        s.distribution.basso,
        s.average_score,
        s.max_chain_score,
        s.spof_count
    );
    if s.value_weighted {
        println!("BOM value {:.2} (score weighted by line value)", s.total_value);
    }
    println!();
    println!("{}", table.render(OutputFormat::Auto));

    if !s.top.is_empty() {
        println!();
        println!("{}", style(format!("Top {} by chain score", s.top.len())).bold());
        for (i, c) in s.top.iter().enumerate() {
            println!(
                "  {}. {} {:.1} {}{}",
                i + 1,
                c.part_number,
                c.score,
                styled_level(c.level),
                if c.spof { " SPOF" } else { "" }
            );
        }
    }

    for issue in &analysis.graph.issues {
        println!("{} {}", style("!").yellow(), issue);
    }
    Ok(())
}

/// One row per BOM line
fn line_table(analysis: &BomAnalysis) -> Table {
    let mut table = Table::new([
        "PART", "QTY", "SCORE", "CHAIN", "LEVEL", "SPOF", "TOP FACTOR",
    ]);
    for outcome in &analysis.outcomes {
        match outcome {
            BatchOutcome::Assessed(a) => table.push([
                a.part_number.clone(),
                format!("{}", a.quantity),
                format!("{:.1}", a.score),
                format!("{:.1}", a.effective_score()),
                a.effective_level().to_string(),
                if a.spof { "yes" } else { "" }.to_string(),
                a.top_factor()
                    .map_or_else(|| "-".to_string(), |f| f.factor.to_string()),
            ]),
            BatchOutcome::NotFound { part_number } => table.push([
                part_number.clone(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "NOT FOUND".to_string(),
                String::new(),
                "-".to_string(),
            ]),
        }
    }
    table
}

//! `srt score` command - score individual components

use console::style;
use miette::Result;

use crate::analysis::{BatchOutcome, BatchRequest, BatchScorer, RiskAssessment};
use crate::cli::helpers::{format_opt, open_session, print_structured, styled_level, truncate_str};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    /// Part numbers to score
    #[arg(required = true)]
    pub part_numbers: Vec<String>,

    /// Client whose overrides apply
    #[arg(long, short = 'c')]
    pub client: Option<String>,

    /// Boards per week (overrides client and config)
    #[arg(long)]
    pub run_rate: Option<f64>,
}

pub fn run(args: ScoreArgs, global: &GlobalOpts) -> Result<()> {
    if args.run_rate.is_some_and(|r| r < 0.0) {
        return Err(miette::miette!("--run-rate must not be negative"));
    }
    let session = open_session(global)?;
    let scorer = BatchScorer::new(&session.scoring, &session.store);

    let mut request = BatchRequest::for_parts(args.part_numbers.iter().cloned());
    request.client_id = args.client.clone();
    request.run_rate = args.run_rate;
    let outcomes = scorer.score(&request);

    if outcomes.iter().all(|o| o.assessment().is_none()) {
        return Err(miette::miette!(
            "No component found for {}",
            args.part_numbers.join(", ")
        ));
    }

    if print_structured(&outcomes, session.format)? {
        return Ok(());
    }

    match (session.format, outcomes.as_slice()) {
        (OutputFormat::Auto, [BatchOutcome::Assessed(a)]) => print_detail(a, global.quiet),
        _ => print!("{}", outcome_table(&outcomes).render(session.format)),
    }
    Ok(())
}

/// One row per outcome
pub(crate) fn outcome_table(outcomes: &[BatchOutcome]) -> Table {
    let mut table = Table::new([
        "PART", "SUPPLIER", "SCORE", "LEVEL", "TOP FACTOR", "BUFFER WK", "ISSUES",
    ]);
    for outcome in outcomes {
        match outcome {
            BatchOutcome::Assessed(a) => table.push([
                a.part_number.clone(),
                truncate_str(a.supplier.as_deref().unwrap_or("-"), 20),
                format!("{:.1}", a.score),
                a.level.to_string(),
                a.top_factor()
                    .map_or_else(|| "-".to_string(), |f| f.factor.to_string()),
                format_opt(a.buffer_weeks, 1),
                a.issues.len().to_string(),
            ]),
            BatchOutcome::NotFound { part_number } => table.push([
                part_number.clone(),
                "-".to_string(),
                "-".to_string(),
                "NOT FOUND".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]),
        }
    }
    table
}

fn print_detail(a: &RiskAssessment, quiet: bool) {
    println!(
        "{} {:.1} {}",
        style(&a.part_number).cyan().bold(),
        a.score,
        styled_level(a.level)
    );
    if quiet {
        return;
    }
    if let Some(supplier) = &a.supplier {
        println!("Supplier: {}", supplier);
    }
    println!();

    let mut factors = Table::new(["FACTOR", "POINTS", "DETAIL"]);
    for f in a.factors.iter().filter(|f| f.points != 0.0 || f.factor.is_base()) {
        factors.push([f.factor.to_string(), format!("{:.2}", f.points), f.detail.clone()]);
    }
    println!("{}", factors.render(OutputFormat::Auto));

    println!();
    println!(
        "Buffer coverage: {} weeks (ratio {})",
        format_opt(a.buffer_weeks, 1),
        format_opt(a.coverage_ratio, 2)
    );
    if a.single_source_maximal {
        println!("{}", style("Single plant, no alternative source").red());
    }
    println!(
        "Tier-2 materials: {:.1}/25 (contributes {:.2})",
        a.tier2.raw_score, a.tier2.contribution
    );
    for m in a.tier2.bottlenecks() {
        println!(
            "  {} {} {:.0}% from {}",
            style("!").yellow(),
            m.name,
            m.concentration * 100.0,
            m.dominant_country
        );
    }
    let class = a
        .switching
        .class
        .map_or_else(|| "-".to_string(), |c| c.to_string());
    println!(
        "Switching cost: {:.0} h ({}{})",
        a.switching.total_hours,
        class,
        if a.switching.estimated { ", estimated" } else { "" }
    );

    if !a.suggestions.is_empty() {
        println!();
        println!("{}", style("Mitigations").bold());
        for s in &a.suggestions {
            println!("  {} {} ({} h)", style("→").dim(), s.action, s.effort_hours);
        }
        println!("  Total effort: {} h", a.mitigation_hours);
    }

    if !a.issues.is_empty() {
        println!();
        println!("{}", style("Data issues").bold());
        for issue in &a.issues {
            println!("  {} {}", style("!").yellow(), issue);
        }
    }
}

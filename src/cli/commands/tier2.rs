//! `srt tier2` command - upstream material bottlenecks of a BOM

use console::style;
use miette::Result;

use crate::analysis::BatchScorer;
use crate::cli::helpers::{open_session, print_structured, BomInput};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct Tier2Args {
    #[command(flatten)]
    pub input: BomInput,
}

pub fn run(args: Tier2Args, global: &GlobalOpts) -> Result<()> {
    let session = open_session(global)?;
    let (_, request) = args.input.request(&session.project)?;
    let scorer = BatchScorer::new(&session.scoring, &session.store);
    let report = scorer.analyze(&request, 0).tier2;

    if print_structured(&report, session.format)? {
        return Ok(());
    }

    let mut materials = Table::new([
        "MATERIAL", "COMPONENTS", "MAX SHARE", "COUNTRY", "CRITICALITY", "IMPACT",
    ]);
    for m in &report.materials {
        materials.push([
            m.name.clone(),
            m.affected.len().to_string(),
            format!("{:.0}%", m.max_share * 100.0),
            m.dominant_country.clone(),
            m.criticality.to_string(),
            format!("{:.2}", m.impact),
        ]);
    }
    if session.format != OutputFormat::Auto {
        print!("{}", materials.render(session.format));
        return Ok(());
    }

    println!(
        "{} component(s), mean tier-2 score {:.1}/25",
        report.component_count, report.average_score
    );
    if global.quiet {
        return Ok(());
    }
    if !materials.is_empty() {
        println!();
        println!("{}", materials.render(OutputFormat::Auto));
    }

    if !report.countries.is_empty() {
        println!();
        let mut countries = Table::new(["COUNTRY", "EXPOSURE", "MATERIALS", "COMPONENTS"]);
        for c in &report.countries {
            countries.push([
                c.country.clone(),
                format!("{:.2}", c.total_exposure),
                c.materials.join(", "),
                c.components.len().to_string(),
            ]);
        }
        println!("{}", countries.render(OutputFormat::Auto));
    }

    if !report.recommendations.is_empty() {
        println!();
        println!("{}", style("Recommendations").bold());
        for r in &report.recommendations {
            println!("  {} {}", style("→").dim(), r);
        }
    }
    Ok(())
}

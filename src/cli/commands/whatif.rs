//! `srt whatif` command - deterministic disruption scenarios
//!
//! Exactly one scenario is given per run, either by name (`--scenario
//! taiwan-blockade`) or by its parameters (`--country taiwan --weeks 8`).

use chrono::NaiveDate;
use clap::ArgGroup;
use console::style;
use miette::Result;

use crate::analysis::{BatchScorer, Scenario, WhatIfSimulator};
use crate::cli::helpers::{open_session, print_structured, styled_level, BomInput};
use crate::cli::table::Table;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
#[command(group(
    ArgGroup::new("kind")
        .required(true)
        .args(["scenario", "country", "supplier", "lead_time_increase", "demand_surge", "material"])
))]
pub struct WhatIfArgs {
    #[command(flatten)]
    pub input: BomInput,

    /// Predefined scenario (taiwan-blockade, taiwan-earthquake, china-lockdown,
    /// chip-shortage, severe-shortage, neon-crisis)
    #[arg(long, short = 's')]
    pub scenario: Option<String>,

    /// Block every plant in this country
    #[arg(long)]
    pub country: Option<String>,

    /// Take this supplier offline
    #[arg(long)]
    pub supplier: Option<String>,

    /// Increase lead times by this percentage
    #[arg(long, value_name = "PERCENT")]
    pub lead_time_increase: Option<f64>,

    /// Increase demand by this percentage
    #[arg(long, value_name = "PERCENT")]
    pub demand_surge: Option<f64>,

    /// Make this tier-2 material unavailable
    #[arg(long, value_name = "MATERIAL_ID")]
    pub material: Option<String>,

    /// Disruption length in weeks
    #[arg(long, short = 'w', default_value_t = 4.0)]
    pub weeks: f64,

    /// First day of the disruption (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<NaiveDate>,
}

impl WhatIfArgs {
    fn build_scenario(&self) -> Result<Scenario> {
        if !self.weeks.is_finite() || self.weeks < 0.0 {
            return Err(miette::miette!("--weeks must be a non-negative number"));
        }
        for (flag, value) in [
            ("--lead-time-increase", self.lead_time_increase),
            ("--demand-surge", self.demand_surge),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(miette::miette!("{} must be a finite number", flag));
            }
        }
        if let Some(name) = &self.scenario {
            return Scenario::by_name(name).ok_or_else(|| {
                let known: Vec<&str> = Scenario::predefined().into_iter().map(|(n, _)| n).collect();
                miette::miette!("Unknown scenario '{}'. Known: {}", name, known.join(", "))
            });
        }
        let weeks = self.weeks;
        let scenario = if let Some(country) = &self.country {
            Scenario::CountryBlock {
                country: country.clone(),
                weeks,
            }
        } else if let Some(supplier) = &self.supplier {
            Scenario::SupplierOutage {
                supplier: supplier.clone(),
                weeks,
            }
        } else if let Some(percent) = self.lead_time_increase {
            Scenario::LeadTimeIncrease { percent }
        } else if let Some(percent) = self.demand_surge {
            Scenario::DemandSurge { percent, weeks }
        } else if let Some(material_id) = &self.material {
            Scenario::MaterialShortage {
                material_id: material_id.clone(),
                weeks,
            }
        } else {
            return Err(miette::miette!("No scenario given"));
        };
        Ok(scenario)
    }
}

pub fn run(args: WhatIfArgs, global: &GlobalOpts) -> Result<()> {
    let scenario = args.build_scenario()?;
    let start = args
        .start
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let session = open_session(global)?;
    let (_, request) = args.input.request(&session.project)?;
    let scorer = BatchScorer::new(&session.scoring, &session.store);
    let baseline = scorer.analyze(&request, 0);
    let report = WhatIfSimulator::new(&scorer).simulate(&request, &baseline, &scenario, start);

    if print_structured(&report, session.format)? {
        return Ok(());
    }

    let mut impacts = Table::new([
        "PART", "SCORE", "ADJUSTED", "LEVEL", "BUFFER WK", "LOST WK", "DEPLETES", "IMPACT",
    ]);
    for i in &report.impacted {
        impacts.push([
            i.part_number.clone(),
            format!("{:.1}", i.original_score),
            format!("{:.1}", i.adjusted_score),
            i.adjusted_level.to_string(),
            format!("{:.1}", i.original_buffer_weeks),
            format!("{:.1}", i.weeks_lost),
            i.depletion_date
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
            format!("{:.2}", i.financial_impact),
        ]);
    }
    if session.format != OutputFormat::Auto {
        print!("{}", impacts.render(session.format));
        return Ok(());
    }

    let s = &report.summary;
    println!(
        "{} from {}",
        style(&report.description).cyan().bold(),
        report.start
    );
    println!(
        "{} of {} component(s) affected, {} critical, overall {}",
        s.affected_count,
        s.total_components,
        s.critical_count,
        styled_level(s.overall_level)
    );
    if global.quiet {
        return Ok(());
    }
    println!(
        "Mean score {:.1} -> {:.1} ({:+.1})",
        s.avg_original_score, s.avg_adjusted_score, s.score_change
    );
    println!(
        "Production lost: {:.1} weeks, financial impact {:.2} of BOM value {:.2}",
        s.production_lost_weeks,
        s.total_financial_impact,
        s.total_bom_value
    );
    if !impacts.is_empty() {
        println!();
        println!("{}", impacts.render(OutputFormat::Auto));
    }
    Ok(())
}

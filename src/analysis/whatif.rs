//! What-if disruption simulation
//!
//! Applies a deterministic disruption to a scored BOM: which parts are hit,
//! how long their buffer lasts, how much production is lost, and how their
//! score moves when the perturbed record is scored again.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analysis::assessment::RiskLevel;
use crate::analysis::batch::{BatchRequest, BatchScorer, BomAnalysis};
use crate::analysis::config::ScoringConfig;
use crate::core::store::RecordStore;
use crate::entities::{BufferStock, ClientOverride, ComponentRecord};

/// A disruption to simulate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scenario {
    /// Every plant in a country stops
    CountryBlock { country: String, weeks: f64 },
    /// One supplier stops shipping
    SupplierOutage { supplier: String, weeks: f64 },
    /// Lead times grow by a percentage
    LeadTimeIncrease { percent: f64 },
    /// Consumption grows by a percentage for a period
    DemandSurge { percent: f64, weeks: f64 },
    /// An upstream material is unavailable
    MaterialShortage { material_id: String, weeks: f64 },
}

impl Scenario {
    pub fn describe(&self) -> String {
        match self {
            Scenario::CountryBlock { country, weeks } => {
                format!("Production blocked in {} for {} weeks", country, weeks)
            }
            Scenario::SupplierOutage { supplier, weeks } => {
                format!("Supplier {} offline for {} weeks", supplier, weeks)
            }
            Scenario::LeadTimeIncrease { percent } => format!("Lead times +{}%", percent),
            Scenario::DemandSurge { percent, weeks } => {
                format!("Demand +{}% for {} weeks", percent, weeks)
            }
            Scenario::MaterialShortage { material_id, weeks } => {
                format!("{} unavailable for {} weeks", material_id, weeks)
            }
        }
    }

    /// Named scenarios shipped with the tool
    pub fn predefined() -> Vec<(&'static str, Scenario)> {
        vec![
            (
                "taiwan-blockade",
                Scenario::CountryBlock {
                    country: "taiwan".to_string(),
                    weeks: 8.0,
                },
            ),
            (
                "taiwan-earthquake",
                Scenario::CountryBlock {
                    country: "taiwan".to_string(),
                    weeks: 4.0,
                },
            ),
            (
                "china-lockdown",
                Scenario::CountryBlock {
                    country: "china".to_string(),
                    weeks: 6.0,
                },
            ),
            ("chip-shortage", Scenario::LeadTimeIncrease { percent: 50.0 }),
            ("severe-shortage", Scenario::LeadTimeIncrease { percent: 100.0 }),
            (
                "neon-crisis",
                Scenario::MaterialShortage {
                    material_id: "neon_gas".to_string(),
                    weeks: 12.0,
                },
            ),
        ]
    }

    pub fn by_name(name: &str) -> Option<Scenario> {
        let wanted = name.trim().to_lowercase();
        Self::predefined()
            .into_iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, s)| s)
    }
}

/// Effect of a scenario on one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentImpact {
    pub part_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    pub original_score: f64,
    pub adjusted_score: f64,
    pub adjusted_level: RiskLevel,
    pub score_change: f64,
    pub original_buffer_weeks: f64,
    /// Weeks of normal supply missing because of the disruption
    pub supply_gap_weeks: f64,
    pub remaining_buffer_weeks: f64,
    pub weeks_lost: f64,
    /// Set when the buffer runs out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depletion_date: Option<NaiveDate>,
    /// Boards that cannot be built
    pub production_lost_units: f64,
    pub financial_impact: f64,
}

impl ComponentImpact {
    /// Production stops before the disruption ends
    pub fn is_critical(&self) -> bool {
        self.weeks_lost > 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfSummary {
    pub total_components: usize,
    pub affected_count: usize,
    pub critical_count: usize,
    pub avg_original_score: f64,
    pub avg_adjusted_score: f64,
    pub score_change: f64,
    pub overall_level: RiskLevel,
    pub total_bom_value: f64,
    /// Longest stop among the affected parts
    pub production_lost_weeks: f64,
    pub total_financial_impact: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfReport {
    pub scenario: Scenario,
    pub description: String,
    pub start: NaiveDate,
    pub summary: WhatIfSummary,
    /// Worst hit first
    pub impacted: Vec<ComponentImpact>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// How a scenario hits one record
struct Disruption {
    gap_weeks: f64,
    /// Buffer drained per week, in weeks of normal consumption
    drain_rate: f64,
    lead_time: Option<f64>,
    /// Record with blocked plants removed, when only some are blocked
    record: Option<ComponentRecord>,
}

pub struct WhatIfSimulator<'s, 'a, S: RecordStore + ?Sized> {
    scorer: &'s BatchScorer<'a, S>,
    config: &'a ScoringConfig,
}

impl<'s, 'a, S: RecordStore + ?Sized> WhatIfSimulator<'s, 'a, S> {
    pub fn new(scorer: &'s BatchScorer<'a, S>) -> Self {
        Self {
            config: scorer.engine().config(),
            scorer,
        }
    }

    fn disruption(
        &self,
        scenario: &Scenario,
        record: &ComponentRecord,
        materials: &[String],
        lead_time: Option<f64>,
    ) -> Option<Disruption> {
        let halt = |weeks: f64| Disruption {
            gap_weeks: weeks.max(0.0),
            drain_rate: 1.0,
            lead_time: lead_time.map(|l| l + weeks.max(0.0)),
            record: None,
        };

        match scenario {
            Scenario::CountryBlock { country, weeks } => {
                let table = &self.config.countries;
                let blocked = table.normalize(country);
                let hit = record
                    .plants
                    .iter()
                    .filter(|p| table.normalize(&p.country) == blocked)
                    .count();
                if hit == 0 {
                    None
                } else if hit == record.plants.len() {
                    Some(halt(*weeks))
                } else {
                    // other plants keep shipping, but the part loses paths
                    let mut reduced = record.clone();
                    reduced.plants.retain(|p| table.normalize(&p.country) != blocked);
                    Some(Disruption {
                        gap_weeks: 0.0,
                        drain_rate: 1.0,
                        lead_time,
                        record: Some(reduced),
                    })
                }
            }
            Scenario::SupplierOutage { supplier, weeks } => record
                .supplier
                .as_deref()
                .filter(|s| s.trim().eq_ignore_ascii_case(supplier.trim()))
                .map(|_| halt(*weeks)),
            Scenario::MaterialShortage { material_id, weeks } => materials
                .iter()
                .any(|m| m.eq_ignore_ascii_case(material_id.trim()))
                .then(|| halt(*weeks)),
            Scenario::LeadTimeIncrease { percent } => {
                let lead = lead_time?;
                let extra = lead * percent.max(0.0) / 100.0;
                Some(Disruption {
                    gap_weeks: extra,
                    drain_rate: 1.0,
                    lead_time: Some(lead + extra),
                    record: None,
                })
            }
            Scenario::DemandSurge { percent, weeks } => {
                let surge = percent.max(0.0) / 100.0;
                Some(Disruption {
                    gap_weeks: weeks.max(0.0) * surge,
                    drain_rate: surge,
                    lead_time,
                    record: None,
                })
            }
        }
    }

    /// Apply a scenario to an analyzed BOM
    pub fn simulate(
        &self,
        request: &BatchRequest,
        baseline: &BomAnalysis,
        scenario: &Scenario,
        start: NaiveDate,
    ) -> WhatIfReport {
        let store = self.scorer.store();
        let engine = self.scorer.engine();
        let run_rate = baseline.run_rate;
        let dependents = request.dependents();

        let mut total = 0usize;
        let mut original_sum = 0.0;
        let mut adjusted_sum = 0.0;
        let mut impacted = Vec::new();

        for (line, outcome) in request.lines.iter().zip(&baseline.outcomes) {
            let (Some(original), Some(record)) = (outcome.assessment(), store.component(&line.part_number))
            else {
                continue;
            };
            total += 1;
            original_sum += original.score;

            let materials: Vec<String> = original.tier2.materials.iter().map(|m| m.id.clone()).collect();
            let existing = self.scorer.client_override(request, &line.part_number);
            let lead_time = existing
                .and_then(|o| o.lead_time_weeks)
                .or(record.lead_time_weeks)
                .filter(|l| *l >= 0.0);

            let Some(d) = self.disruption(scenario, record, &materials, lead_time) else {
                adjusted_sum += original.score;
                continue;
            };

            let buffer = original.buffer_weeks.unwrap_or(0.0);
            let remaining = (buffer - d.gap_weeks).max(0.0);
            let weeks_lost = (d.gap_weeks - buffer).max(0.0);
            // None when the date falls outside the calendar
            let depletion_date = (weeks_lost > 0.0 && d.drain_rate > 0.0)
                .then(|| (buffer / d.drain_rate * 7.0).round())
                .filter(|days| days.is_finite())
                .and_then(|days| Duration::try_days(days as i64))
                .and_then(|offset| start.checked_add_signed(offset));

            let mut perturbed = existing
                .cloned()
                .unwrap_or_else(|| ClientOverride::new(request.client_id.clone().unwrap_or_default(), line.part_number.clone()));
            perturbed.lead_time_weeks = d.lead_time;
            if d.gap_weeks > 0.0 {
                perturbed.buffer_stock = Some(BufferStock::weeks(remaining));
            }

            let ctx = self.scorer.context(line, &dependents);
            let scored_record = d.record.as_ref().unwrap_or(record);
            let adjusted = engine.score_with(scored_record, Some(&perturbed), run_rate, &ctx);
            adjusted_sum += adjusted.score;

            let production_lost_units = weeks_lost * run_rate;
            impacted.push(ComponentImpact {
                part_number: original.part_number.clone(),
                supplier: original.supplier.clone(),
                original_score: original.score,
                adjusted_score: adjusted.score,
                adjusted_level: adjusted.level,
                score_change: round2(adjusted.score - original.score),
                original_buffer_weeks: round2(buffer),
                supply_gap_weeks: round2(d.gap_weeks),
                remaining_buffer_weeks: round2(remaining),
                weeks_lost: round2(weeks_lost),
                depletion_date,
                production_lost_units: production_lost_units.round(),
                financial_impact: round2(
                    production_lost_units * original.quantity * original.unit_price.unwrap_or(0.0),
                ),
            });
        }

        impacted.sort_by(|a, b| {
            b.weeks_lost
                .total_cmp(&a.weeks_lost)
                .then(b.adjusted_score.total_cmp(&a.adjusted_score))
                .then(a.part_number.cmp(&b.part_number))
        });

        let avg = |sum: f64| if total > 0 { round2(sum / total as f64) } else { 0.0 };
        let avg_original_score = avg(original_sum);
        let avg_adjusted_score = avg(adjusted_sum);
        let summary = WhatIfSummary {
            total_components: total,
            affected_count: impacted.len(),
            critical_count: impacted.iter().filter(|i| i.is_critical()).count(),
            avg_original_score,
            avg_adjusted_score,
            score_change: round2(avg_adjusted_score - avg_original_score),
            overall_level: RiskLevel::classify(avg_adjusted_score, &self.config.thresholds),
            total_bom_value: baseline.summary.total_value,
            production_lost_weeks: impacted.iter().map(|i| i.weeks_lost).fold(0.0, f64::max),
            total_financial_impact: round2(impacted.iter().map(|i| i.financial_impact).sum()),
        };

        log::debug!(
            "Scenario '{}': {} of {} component(s) affected",
            scenario.describe(),
            summary.affected_count,
            total
        );

        WhatIfReport {
            description: scenario.describe(),
            scenario: scenario.clone(),
            start,
            summary,
            impacted,
        }
    }
}

//! Risk factor engine - scores one component record
//!
//! Scoring is a pure function of (record, override, run rate, context):
//! no I/O and no shared state, so records can be scored in parallel.

use std::collections::BTreeSet;

use crate::analysis::assessment::{DataIssue, Factor, FactorScore, RiskAssessment, RiskLevel, Suggestion};
use crate::analysis::config::{step_value, ScoringConfig};
use crate::analysis::country::Stage;
use crate::analysis::switching::switching_cost;
use crate::analysis::tier2::{Tier2MaterialScorer, Tier2Result};
use crate::entities::{
    AllocationStatus, BufferStock, ClientOverride, ComponentMaterialLink, ComponentRecord, CriticalMaterial,
    EolStatus, FinancialRating, NodeTier, TechnologyNode,
};

/// Batch-level facts that change how a single record scores
#[derive(Debug, Clone, Default)]
pub struct ScoreContext<'c> {
    /// Explicit material links for this part number
    pub material_links: &'c [ComponentMaterialLink],
    /// The part appears as a dependent in the BOM's dependency edges
    pub dependent_in_bom: bool,
    /// Units per board from the BOM line, ahead of the client override
    pub bom_quantity: Option<f64>,
}

/// Inputs after applying the client override
struct Effective {
    lead_time: Option<f64>,
    buffer_weeks: Option<f64>,
    quantity: f64,
}

fn non_negative(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x >= 0.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub struct RiskFactorEngine<'a> {
    config: &'a ScoringConfig,
    tier2: Tier2MaterialScorer<'a>,
}

impl<'a> RiskFactorEngine<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self {
            config,
            tier2: Tier2MaterialScorer::new(config),
        }
    }

    /// Add store-held materials to the tier-2 catalog
    pub fn with_materials(mut self, materials: impl IntoIterator<Item = CriticalMaterial>) -> Self {
        self.tier2 = self.tier2.with_materials(materials);
        self
    }

    pub fn config(&self) -> &'a ScoringConfig {
        self.config
    }

    pub fn tier2(&self) -> &Tier2MaterialScorer<'a> {
        &self.tier2
    }

    /// Score a record on its own
    pub fn score(
        &self,
        record: &ComponentRecord,
        client_override: Option<&ClientOverride>,
        run_rate: f64,
    ) -> RiskAssessment {
        self.score_with(record, client_override, run_rate, &ScoreContext::default())
    }

    /// Score a record within a batch context
    pub fn score_with(
        &self,
        record: &ComponentRecord,
        client_override: Option<&ClientOverride>,
        run_rate: f64,
        ctx: &ScoreContext<'_>,
    ) -> RiskAssessment {
        let mut issues: Vec<DataIssue> = record
            .negative_fields()
            .into_iter()
            .chain(client_override.map(ClientOverride::negative_fields).unwrap_or_default())
            .map(|(field, value)| DataIssue::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
            })
            .collect();

        let effective = self.effective_inputs(record, client_override, run_rate, ctx);

        let mut factors = Vec::with_capacity(15);
        factors.push(self.geographic(record, &mut issues));
        let (single_source, maximal) = self.single_source(record, &mut issues);
        factors.push(single_source);
        factors.push(self.lead_time(&effective, &mut issues));
        let (buffer, coverage_ratio) = self.buffer_stock(&effective, &mut issues);
        factors.push(buffer);
        factors.push(self.dependency(record, ctx));
        factors.push(self.proprietary(record));
        factors.push(self.certification(record, &mut issues));

        factors.push(self.eol(record, &mut issues));
        factors.push(self.alternatives(record, &mut issues));
        factors.push(self.financial(record, &mut issues));
        factors.push(self.allocation(record, &mut issues));
        factors.push(self.price_increase(record));
        factors.push(self.package(record));
        factors.push(self.technology_node(record));

        let mut tier2 = self.tier2.score_record(record, ctx.material_links);
        issues.append(&mut tier2.issues);
        factors.push(FactorScore {
            factor: Factor::MaterialConcentration,
            points: tier2.contribution,
            detail: format!(
                "tier-2 raw {:.0}/{:.0}, {} materials, {} bottlenecks",
                tier2.raw_score,
                self.config.tier2.raw_max,
                tier2.materials.len(),
                tier2.bottlenecks().len()
            ),
        });

        let total: f64 = factors.iter().map(|f| f.points).sum();
        let score = round2(total.clamp(0.0, 100.0));
        let level = RiskLevel::classify(score, &self.config.thresholds);

        let suggestions = self.suggestions(record, &factors, &effective, &tier2);
        let mitigation_hours = suggestions.iter().map(|s| s.effort_hours).sum();

        log::debug!(
            "{}: score {:.2} ({}), {} issue(s)",
            record.part_number(),
            score,
            level,
            issues.len()
        );

        RiskAssessment {
            part_number: record.part_number().to_string(),
            supplier: record.supplier.clone(),
            score,
            level,
            factors,
            suggestions,
            mitigation_hours,
            buffer_weeks: effective.buffer_weeks,
            coverage_ratio,
            single_source_maximal: maximal,
            tier2,
            switching: switching_cost(record, &self.config.switching),
            unit_price: non_negative(record.unit_price),
            quantity: effective.quantity,
            issues,
            chain: None,
            spof: false,
        }
    }

    fn effective_inputs(
        &self,
        record: &ComponentRecord,
        client_override: Option<&ClientOverride>,
        run_rate: f64,
        ctx: &ScoreContext<'_>,
    ) -> Effective {
        let lead_time = non_negative(client_override.and_then(|o| o.lead_time_weeks))
            .or_else(|| non_negative(record.lead_time_weeks));
        let buffer = client_override
            .and_then(|o| o.buffer_stock)
            .filter(BufferStock::is_valid)
            .or(record.buffer_stock);
        let quantity = ctx
            .bom_quantity
            .or_else(|| client_override.and_then(|o| o.bom_quantity))
            .filter(|q| q.is_finite() && *q > 0.0)
            .unwrap_or(1.0);
        let weekly_consumption = run_rate.max(0.0) * quantity;
        let buffer_weeks = buffer.and_then(|b| b.coverage_weeks(weekly_consumption));

        Effective {
            lead_time,
            buffer_weeks,
            quantity,
        }
    }

    fn stage_risk(
        &self,
        stage: Stage,
        countries: &BTreeSet<String>,
        scale: f64,
        issues: &mut Vec<DataIssue>,
    ) -> f64 {
        let table = &self.config.countries;
        let canonical: BTreeSet<String> = countries.iter().map(|c| table.normalize(c)).collect();

        let mut worst = 0.0_f64;
        for country in &canonical {
            let w = table.weight(stage, country);
            if !w.known {
                log::warn!("Unknown {} country '{}', using default weight", stage, country);
                issues.push(DataIssue::unknown(format!("{} country", stage), country.clone()));
            }
            worst = worst.max(w.weight);
        }

        let normalized = if scale > 0.0 {
            (worst / scale).min(1.0)
        } else {
            0.0
        };
        normalized * self.config.geographic.spread_multiplier(canonical.len())
    }

    fn geographic(&self, record: &ComponentRecord, issues: &mut Vec<DataIssue>) -> FactorScore {
        let geo = &self.config.geographic;
        let frontend = record.frontend_countries();
        let backend = record.backend_countries();

        if frontend.is_empty() && backend.is_empty() {
            issues.push(DataIssue::missing("plants"));
            return FactorScore {
                factor: Factor::Geographic,
                points: 0.0,
                detail: "no plant data".to_string(),
            };
        }

        // A stage with no tagged plant is assumed to run where the other does
        let frontend = if frontend.is_empty() { backend.clone() } else { frontend };
        let backend = if backend.is_empty() { frontend.clone() } else { backend };

        let fe = self.stage_risk(Stage::Frontend, &frontend, geo.frontend_scale, issues);
        let be = self.stage_risk(Stage::Backend, &backend, geo.backend_scale, issues);
        let points = self.config.weights.geographic * (geo.frontend_share * fe + geo.backend_share * be);

        FactorScore {
            factor: Factor::Geographic,
            points,
            detail: format!(
                "frontend {} ({:.2}), backend {} ({:.2})",
                frontend.iter().cloned().collect::<Vec<_>>().join("/"),
                fe,
                backend.iter().cloned().collect::<Vec<_>>().join("/"),
                be
            ),
        }
    }

    fn single_source(&self, record: &ComponentRecord, issues: &mut Vec<DataIssue>) -> (FactorScore, bool) {
        let s = &self.config.single_source;
        let paths = record.production_paths();
        if paths == 0 {
            // plants already reported missing by the geographic factor
            if record.plants.is_empty() && !issues.contains(&DataIssue::missing("plants")) {
                issues.push(DataIssue::missing("plants"));
            }
            return (
                FactorScore {
                    factor: Factor::SingleSource,
                    points: 0.0,
                    detail: "no plant data".to_string(),
                },
                false,
            );
        }

        let plant_fraction = match paths {
            1 => s.one_plant,
            2 => s.two_plants,
            _ => 0.0,
        };
        let alternatives = record.alternative_sources.unwrap_or(0);
        let alt_multiplier = match alternatives {
            0 => 1.0,
            1 => s.one_alternative,
            _ => s.many_alternatives,
        };
        let points = self.config.weights.single_source * plant_fraction * alt_multiplier;
        // unknown alternatives never make a part maximal
        let maximal = paths == 1 && record.alternative_sources == Some(0);

        (
            FactorScore {
                factor: Factor::SingleSource,
                points,
                detail: match record.alternative_sources {
                    Some(n) => format!("{} production path(s), {} alternative(s)", paths, n),
                    None => format!("{} production path(s), alternatives unknown", paths),
                },
            },
            maximal,
        )
    }

    fn lead_time(&self, effective: &Effective, issues: &mut Vec<DataIssue>) -> FactorScore {
        let Some(weeks) = effective.lead_time else {
            issues.push(DataIssue::missing("lead_time_weeks"));
            return FactorScore {
                factor: Factor::LeadTime,
                points: 0.0,
                detail: "lead time unknown".to_string(),
            };
        };

        let fraction = step_value(&self.config.lead_time.tiers, weeks);
        FactorScore {
            factor: Factor::LeadTime,
            points: self.config.weights.lead_time * fraction,
            detail: format!("{} weeks", weeks),
        }
    }

    fn buffer_stock(&self, effective: &Effective, issues: &mut Vec<DataIssue>) -> (FactorScore, Option<f64>) {
        let b = &self.config.buffer;
        let weight = self.config.weights.buffer_stock;

        let Some(buffer_weeks) = effective.buffer_weeks else {
            issues.push(DataIssue::missing("buffer_stock"));
            return (
                FactorScore {
                    factor: Factor::BufferStock,
                    points: 0.0,
                    detail: "buffer unknown".to_string(),
                },
                None,
            );
        };
        let lead = match effective.lead_time {
            Some(lead) if lead > 0.0 => lead,
            _ => {
                return (
                    FactorScore {
                        factor: Factor::BufferStock,
                        points: 0.0,
                        detail: format!("{:.1} weeks of buffer, no lead time to compare", buffer_weeks),
                    },
                    None,
                )
            }
        };

        let coverage = buffer_weeks / lead;
        let points = if coverage < b.critical_coverage {
            weight
        } else if coverage < b.safe_coverage {
            weight * b.partial_ceiling * (b.safe_coverage - coverage)
                / (b.safe_coverage - b.critical_coverage)
        } else {
            0.0
        };

        (
            FactorScore {
                factor: Factor::BufferStock,
                points,
                detail: format!("{:.1} weeks, coverage {:.2}x lead time", buffer_weeks, coverage),
            },
            Some(coverage),
        )
    }

    fn dependency(&self, record: &ComponentRecord, ctx: &ScoreContext<'_>) -> FactorScore {
        let dependent = ctx.dependent_in_bom || record.standalone == Some(false);
        FactorScore {
            factor: Factor::Dependency,
            points: if dependent { self.config.weights.dependency } else { 0.0 },
            detail: if dependent { "depends on other parts" } else { "standalone" }.to_string(),
        }
    }

    fn proprietary(&self, record: &ComponentRecord) -> FactorScore {
        let p = &self.config.proprietary;
        let weight = self.config.weights.proprietary;
        let proprietary = record.proprietary == Some(true);
        let non_commodity = record.commodity == Some(false);

        let mut points = 0.0;
        if proprietary {
            points += weight * p.proprietary;
        }
        if non_commodity {
            points += weight * p.non_commodity;
        }

        let detail = match (proprietary, non_commodity) {
            (true, true) => "proprietary, non-commodity",
            (true, false) => "proprietary",
            (false, true) => "non-commodity",
            (false, false) => "standard part",
        };
        FactorScore {
            factor: Factor::Proprietary,
            points: points.min(weight),
            detail: detail.to_string(),
        }
    }

    fn certification(&self, record: &ComponentRecord, issues: &mut Vec<DataIssue>) -> FactorScore {
        let Some(weeks) = non_negative(record.requalification_weeks) else {
            issues.push(DataIssue::missing("requalification_weeks"));
            return FactorScore {
                factor: Factor::Certification,
                points: 0.0,
                detail: "requalification time unknown".to_string(),
            };
        };
        let triggered = weeks > self.config.certification.threshold_weeks;
        FactorScore {
            factor: Factor::Certification,
            points: if triggered { self.config.weights.certification } else { 0.0 },
            detail: format!("{} weeks to requalify", weeks),
        }
    }

    fn eol(&self, record: &ComponentRecord, issues: &mut Vec<DataIssue>) -> FactorScore {
        let e = &self.config.lifecycle.eol;
        let status = record.eol_status.unwrap_or_else(|| {
            issues.push(DataIssue::missing("eol_status"));
            EolStatus::Active
        });
        let points = match status {
            EolStatus::Active => 0.0,
            EolStatus::Nrnd => e.nrnd,
            EolStatus::LastBuy => e.last_buy,
            EolStatus::Eol => e.eol,
            EolStatus::Obsolete => e.obsolete,
        };
        FactorScore {
            factor: Factor::EolStatus,
            points,
            detail: status.to_string(),
        }
    }

    fn alternatives(&self, record: &ComponentRecord, issues: &mut Vec<DataIssue>) -> FactorScore {
        let a = &self.config.lifecycle.alternatives;
        let (points, detail) = match record.alternative_sources {
            None => {
                issues.push(DataIssue::missing("alternative_sources"));
                (0.0, "unknown".to_string())
            }
            Some(0) => (a.none, "no alternatives".to_string()),
            Some(1) => (a.single, "one alternative".to_string()),
            Some(n) => (-a.multiple_credit, format!("{} alternatives", n)),
        };
        FactorScore {
            factor: Factor::AlternativeSources,
            points,
            detail,
        }
    }

    fn financial(&self, record: &ComponentRecord, issues: &mut Vec<DataIssue>) -> FactorScore {
        let f = &self.config.lifecycle.financial;
        let (points, detail) = match record.financial_rating {
            None => {
                issues.push(DataIssue::missing("financial_rating"));
                (0.0, "unrated".to_string())
            }
            Some(r) => (
                match r {
                    FinancialRating::A => f.a,
                    FinancialRating::B => f.b,
                    FinancialRating::C => f.c,
                    FinancialRating::D => f.d,
                },
                format!("rating {}", r),
            ),
        };
        FactorScore {
            factor: Factor::FinancialHealth,
            points,
            detail,
        }
    }

    fn allocation(&self, record: &ComponentRecord, issues: &mut Vec<DataIssue>) -> FactorScore {
        let a = &self.config.lifecycle.allocation;
        let status = record.allocation.unwrap_or_else(|| {
            issues.push(DataIssue::missing("allocation"));
            AllocationStatus::Normal
        });
        let points = match status {
            AllocationStatus::Normal => 0.0,
            AllocationStatus::Constrained => a.constrained,
            AllocationStatus::Allocated => a.allocated,
        };
        FactorScore {
            factor: Factor::Allocation,
            points,
            detail: status.to_string(),
        }
    }

    fn price_increase(&self, record: &ComponentRecord) -> FactorScore {
        let pct = non_negative(record.last_price_increase_pct).unwrap_or(0.0);
        FactorScore {
            factor: Factor::PriceIncrease,
            points: step_value(&self.config.lifecycle.price_increase, pct),
            detail: format!("+{}%", pct),
        }
    }

    fn package(&self, record: &ComponentRecord) -> FactorScore {
        let l = &self.config.lifecycle;
        let package = record.package.as_deref().unwrap_or("");
        let advanced = !package.is_empty() && l.is_advanced_package(package);
        FactorScore {
            factor: Factor::Package,
            points: if advanced { l.package_points } else { 0.0 },
            detail: if package.is_empty() { "unknown".to_string() } else { package.to_string() },
        }
    }

    fn technology_node(&self, record: &ComponentRecord) -> FactorScore {
        let bounds = &self.config.node_tiers;
        let nm = match record.technology_node {
            Some(TechnologyNode::Nanometers(nm)) => Some(nm),
            Some(TechnologyNode::Tier(NodeTier::Advanced)) => Some(bounds.advanced_max_nm),
            Some(TechnologyNode::Tier(NodeTier::Mainstream)) => Some(bounds.mainstream_max_nm),
            Some(TechnologyNode::Tier(_)) | None => None,
        };
        FactorScore {
            factor: Factor::TechnologyNode,
            points: nm.map_or(0.0, |nm| self.config.lifecycle.node_points(nm)),
            detail: record
                .technology_node
                .map_or_else(|| "unknown".to_string(), |n| n.to_string()),
        }
    }

    fn suggestions(
        &self,
        record: &ComponentRecord,
        factors: &[FactorScore],
        effective: &Effective,
        tier2: &Tier2Result,
    ) -> Vec<Suggestion> {
        let cfg = self.config;
        let per_week = cfg.suggestions.hours_per_qualification_week;

        let mut triggered: Vec<&FactorScore> = factors
            .iter()
            .filter(|f| f.points >= cfg.suggestions.materiality)
            .collect();
        // stable: ties keep evaluation order
        triggered.sort_by(|a, b| b.points.total_cmp(&a.points));

        triggered
            .into_iter()
            .map(|f| {
                let (action, effort_hours) = match f.factor {
                    Factor::Geographic => (
                        "Qualify a source with frontend and backend sites in a different region".to_string(),
                        40.0,
                    ),
                    Factor::SingleSource => (
                        "Identify and qualify a second production source".to_string(),
                        non_negative(record.requalification_weeks)
                            .filter(|w| *w > 0.0)
                            .map_or(200.0, |w| w * per_week),
                    ),
                    Factor::LeadTime if f.points >= cfg.weights.lead_time => (
                        "Negotiate a rolling forecast or VMI agreement with the supplier".to_string(),
                        16.0,
                    ),
                    Factor::LeadTime => ("Put a rolling forecast in place with the supplier".to_string(), 8.0),
                    Factor::BufferStock => (
                        match effective.lead_time {
                            Some(lead) => format!(
                                "Raise buffer stock to at least {:.0} weeks of coverage",
                                (lead * cfg.buffer.safe_coverage).ceil()
                            ),
                            None => "Raise buffer stock above the effective lead time".to_string(),
                        },
                        8.0,
                    ),
                    Factor::Dependency => (
                        "Review the parts this component depends on and align their mitigation".to_string(),
                        16.0,
                    ),
                    Factor::Proprietary if record.proprietary == Some(true) => (
                        "Start a redesign study towards a standard, multi-sourced part".to_string(),
                        200.0,
                    ),
                    Factor::Proprietary => ("Look for pin-compatible commodity equivalents".to_string(), 40.0),
                    Factor::Certification => (
                        "Pre-qualify alternatives ahead of any end-of-life notice".to_string(),
                        16.0,
                    ),
                    Factor::EolStatus if f.points >= cfg.lifecycle.eol.last_buy => (
                        "Search for an alternative now and plan a last-time buy".to_string(),
                        80.0,
                    ),
                    Factor::EolStatus => ("Plan the migration to an active part".to_string(), 40.0),
                    Factor::AlternativeSources if record.alternative_sources == Some(0) => (
                        "Redesign around a part available from several manufacturers".to_string(),
                        120.0,
                    ),
                    Factor::AlternativeSources => (
                        "Qualify the available alternative as a second source".to_string(),
                        24.0,
                    ),
                    Factor::FinancialHealth => (
                        "Monitor the supplier for insolvency or acquisition risk".to_string(),
                        16.0,
                    ),
                    Factor::Allocation if record.allocation == Some(AllocationStatus::Allocated) => (
                        "Negotiate guaranteed volumes and vet reliable brokers".to_string(),
                        24.0,
                    ),
                    Factor::Allocation => ("Increase buffer stock and track lead times weekly".to_string(), 8.0),
                    Factor::PriceIncrease => (
                        "Evaluate alternatives to contain cost and reduce dependency".to_string(),
                        8.0,
                    ),
                    Factor::Package => (
                        "Check capacity at the qualified assembly sites for this package".to_string(),
                        8.0,
                    ),
                    Factor::TechnologyNode => (
                        "Evaluate parts on more mature nodes or other foundries".to_string(),
                        40.0,
                    ),
                    Factor::MaterialConcentration => (tier2.suggestion(), 16.0),
                };
                Suggestion {
                    factor: f.factor,
                    action,
                    effort_hours: effort_hours.round() as u32,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BufferStock, Category, FabStage, ProductionPlant};

    fn high_risk_record() -> ComponentRecord {
        let mut r = ComponentRecord::new("HR-1");
        r.plants = vec![ProductionPlant::new("Taiwan", FabStage::Both)];
        r.lead_time_weeks = Some(20.0);
        r.buffer_stock = Some(BufferStock::weeks(2.0));
        r.proprietary = Some(true);
        r.standalone = Some(false);
        r.requalification_weeks = Some(14.0);
        r.alternative_sources = Some(0);
        r
    }

    fn low_risk_record() -> ComponentRecord {
        let mut r = ComponentRecord::new("LR-1");
        r.plants = vec![
            ProductionPlant::new("Germany", FabStage::Both),
            ProductionPlant::new("France", FabStage::Both),
            ProductionPlant::new("Italy", FabStage::Both),
        ];
        r.lead_time_weeks = Some(4.0);
        r.buffer_stock = Some(BufferStock::weeks(12.0));
        r.commodity = Some(true);
        r.proprietary = Some(false);
        r.standalone = Some(true);
        r
    }

    fn points(a: &RiskAssessment, f: Factor) -> f64 {
        a.points(f)
    }

    #[test]
    fn test_high_risk_scenario_is_alto() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let a = engine.score(&high_risk_record(), None, 5000.0);

        assert_eq!(points(&a, Factor::SingleSource), 20.0);
        assert_eq!(points(&a, Factor::LeadTime), 15.0);
        assert_eq!(points(&a, Factor::BufferStock), 15.0);
        assert_eq!(points(&a, Factor::Dependency), 10.0);
        assert_eq!(points(&a, Factor::Proprietary), 10.0);
        assert_eq!(points(&a, Factor::Certification), 5.0);
        assert!(a.single_source_maximal);
        assert!(a.score >= 55.0);
        assert_eq!(a.level, RiskLevel::Alto);
    }

    #[test]
    fn test_low_risk_scenario_is_basso() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let a = engine.score(&low_risk_record(), None, 5000.0);

        assert_eq!(points(&a, Factor::SingleSource), 0.0);
        assert_eq!(points(&a, Factor::LeadTime), 0.0);
        assert_eq!(points(&a, Factor::BufferStock), 0.0);
        assert_eq!(points(&a, Factor::Dependency), 0.0);
        assert_eq!(points(&a, Factor::Proprietary), 0.0);
        assert_eq!(points(&a, Factor::Certification), 0.0);
        assert!(points(&a, Factor::Geographic) < 3.0);
        assert!(a.score < 30.0);
        assert_eq!(a.level, RiskLevel::Basso);
        assert!(!a.single_source_maximal);
    }

    #[test]
    fn test_score_is_deterministic() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let record = high_risk_record();
        let a = engine.score(&record, None, 5000.0);
        let b = engine.score(&record, None, 5000.0);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_score_bounds_with_everything_maxed() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = high_risk_record();
        r.commodity = Some(false);
        r.eol_status = Some(EolStatus::Obsolete);
        r.financial_rating = Some(FinancialRating::D);
        r.allocation = Some(AllocationStatus::Allocated);
        r.last_price_increase_pct = Some(80.0);
        r.package = Some("FCBGA".to_string());
        r.technology_node = Some(TechnologyNode::Nanometers(5.0));
        r.category = Some(Category::Mpu);

        let a = engine.score(&r, None, 5000.0);
        assert_eq!(a.score, 100.0);
        assert_eq!(a.level, RiskLevel::Alto);
    }

    #[test]
    fn test_empty_record_is_neutral_with_issues() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let a = engine.score(&ComponentRecord::new("EMPTY"), None, 5000.0);

        assert!(a.score >= 0.0 && a.score < 30.0);
        assert!(a.issues.contains(&DataIssue::missing("plants")));
        assert!(a.issues.contains(&DataIssue::missing("lead_time_weeks")));
        assert!(a.issues.contains(&DataIssue::missing("buffer_stock")));
        assert!(a.issues.contains(&DataIssue::missing("category")));
        assert_eq!(
            a.issues
                .iter()
                .filter(|i| **i == DataIssue::missing("plants"))
                .count(),
            1
        );
    }

    #[test]
    fn test_lead_time_tiers() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("LT");
        let mut last = f64::MAX;
        for (weeks, expected) in [(20.0, 15.0), (16.0, 10.0), (11.0, 10.0), (10.0, 5.0), (7.0, 5.0), (6.0, 0.0)] {
            r.lead_time_weeks = Some(weeks);
            let p = engine.score(&r, None, 5000.0).points(Factor::LeadTime);
            assert!((p - expected).abs() < 1e-9, "{} weeks -> {}", weeks, p);
            assert!(p <= last);
            last = p;
        }
    }

    #[test]
    fn test_buffer_coverage_boundaries() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("BUF");
        r.lead_time_weeks = Some(10.0);

        r.buffer_stock = Some(BufferStock::weeks(9.99));
        assert_eq!(engine.score(&r, None, 1.0).points(Factor::BufferStock), 15.0);

        // exactly 1.0 is the top of the partial tier
        r.buffer_stock = Some(BufferStock::weeks(10.0));
        let p = engine.score(&r, None, 1.0).points(Factor::BufferStock);
        assert!((p - 8.0).abs() < 1e-9);

        r.buffer_stock = Some(BufferStock::weeks(12.5));
        let p = engine.score(&r, None, 1.0).points(Factor::BufferStock);
        assert!((p - 4.0).abs() < 1e-9);

        // exactly 1.5 is safe
        r.buffer_stock = Some(BufferStock::weeks(15.0));
        assert_eq!(engine.score(&r, None, 1.0).points(Factor::BufferStock), 0.0);
    }

    #[test]
    fn test_buffer_units_use_run_rate_and_quantity() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("UNITS");
        r.lead_time_weeks = Some(4.0);
        r.buffer_stock = Some(BufferStock::units(40_000.0));

        let a = engine.score(&r, None, 5000.0);
        assert_eq!(a.buffer_weeks, Some(8.0));
        assert_eq!(a.coverage_ratio, Some(2.0));

        let ctx = ScoreContext {
            bom_quantity: Some(4.0),
            ..Default::default()
        };
        let a = engine.score_with(&r, None, 5000.0, &ctx);
        assert_eq!(a.buffer_weeks, Some(2.0));
        assert_eq!(a.points(Factor::BufferStock), 15.0);
    }

    #[test]
    fn test_client_override_shadows_record() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("OVR");
        r.lead_time_weeks = Some(4.0);
        r.buffer_stock = Some(BufferStock::weeks(12.0));

        let mut o = ClientOverride::new("ACME", "OVR");
        o.lead_time_weeks = Some(20.0);
        let a = engine.score(&r, Some(&o), 5000.0);
        assert_eq!(a.points(Factor::LeadTime), 15.0);
        assert_eq!(a.coverage_ratio, Some(0.6));

        o.buffer_stock = Some(BufferStock::weeks(40.0));
        let a = engine.score(&r, Some(&o), 5000.0);
        assert_eq!(a.points(Factor::BufferStock), 0.0);
    }

    #[test]
    fn test_more_alternatives_never_raise_single_source() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = high_risk_record();
        let mut last = f64::MAX;
        for alts in 0..5 {
            r.alternative_sources = Some(alts);
            let p = engine.score(&r, None, 5000.0).points(Factor::SingleSource);
            assert!(p <= last);
            last = p;
        }
        r.alternative_sources = Some(1);
        assert!(!engine.score(&r, None, 5000.0).single_source_maximal);
    }

    #[test]
    fn test_plant_count_tiers() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("PL");
        r.alternative_sources = Some(0);
        r.plants = vec![
            ProductionPlant::new("Japan", FabStage::Both),
            ProductionPlant::new("Korea", FabStage::Both),
        ];
        assert_eq!(engine.score(&r, None, 1.0).points(Factor::SingleSource), 10.0);
        r.plants.push(ProductionPlant::new("USA", FabStage::Both));
        assert_eq!(engine.score(&r, None, 1.0).points(Factor::SingleSource), 0.0);
    }

    #[test]
    fn test_geographic_spread_lowers_score() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut single = ComponentRecord::new("G1");
        single.plants = vec![ProductionPlant::new("China", FabStage::Both)];
        let mut spread = ComponentRecord::new("G2");
        spread.plants = vec![
            ProductionPlant::new("China", FabStage::Both),
            ProductionPlant::new("Japan", FabStage::Both),
        ];
        let a = engine.score(&single, None, 1.0).points(Factor::Geographic);
        let b = engine.score(&spread, None, 1.0).points(Factor::Geographic);
        assert!(b < a);
    }

    #[test]
    fn test_unknown_country_uses_default_and_is_reported() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("UC");
        r.plants = vec![ProductionPlant::new("Atlantis", FabStage::Frontend)];
        let a = engine.score(&r, None, 1.0);
        assert!(a.points(Factor::Geographic) > 0.0);
        assert!(a
            .issues
            .contains(&DataIssue::unknown("frontend country", "atlantis")));
    }

    #[test]
    fn test_alternatives_credit_can_lower_score() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("ALT");
        r.alternative_sources = Some(3);
        let a = engine.score(&r, None, 1.0);
        assert_eq!(a.points(Factor::AlternativeSources), -3.0);
        assert!(a.score >= 0.0);
    }

    #[test]
    fn test_dependency_from_bom_context() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("DEP");
        r.standalone = Some(true);
        let ctx = ScoreContext {
            dependent_in_bom: true,
            ..Default::default()
        };
        assert_eq!(engine.score_with(&r, None, 1.0, &ctx).points(Factor::Dependency), 10.0);
        assert_eq!(engine.score(&r, None, 1.0).points(Factor::Dependency), 0.0);
    }

    #[test]
    fn test_suggestions_ordered_by_contribution() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let a = engine.score(&high_risk_record(), None, 5000.0);

        assert!(!a.suggestions.is_empty());
        assert_eq!(a.suggestions[0].factor, Factor::Geographic);
        assert_eq!(a.suggestions[1].factor, Factor::SingleSource);
        assert_eq!(a.suggestions[1].effort_hours, 560);
        let contributions: Vec<f64> = a.suggestions.iter().map(|s| a.points(s.factor)).collect();
        assert!(contributions.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(
            a.mitigation_hours,
            a.suggestions.iter().map(|s| s.effort_hours).sum::<u32>()
        );
    }

    #[test]
    fn test_negative_values_are_ignored_and_reported() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("NEG");
        r.lead_time_weeks = Some(-5.0);
        let a = engine.score(&r, None, 1.0);
        assert_eq!(a.points(Factor::LeadTime), 0.0);
        assert!(a.issues.iter().any(|i| matches!(
            i,
            DataIssue::InvalidValue { field, .. } if field == "lead_time_weeks"
        )));
    }

    #[test]
    fn test_negative_override_buffer_falls_back_to_record() {
        let config = ScoringConfig::default();
        let engine = RiskFactorEngine::new(&config);
        let mut r = ComponentRecord::new("BUF");
        r.buffer_stock = Some(BufferStock::weeks(30.0));
        let mut o = ClientOverride::new("ACME", "BUF");
        o.buffer_stock = Some(BufferStock::weeks(-1.0));

        let a = engine.score(&r, Some(&o), 1.0);
        assert_eq!(a.buffer_weeks, Some(30.0));
        assert!(!a.issues.contains(&DataIssue::missing("buffer_stock")));
        assert!(a.issues.iter().any(|i| matches!(
            i,
            DataIssue::InvalidValue { field, .. } if field == "override.buffer_stock.weeks"
        )));
    }

    #[test]
    fn test_custom_thresholds_change_level_only() {
        let config = ScoringConfig::default();
        let base = RiskFactorEngine::new(&config).score(&low_risk_record(), None, 5000.0);

        let mut strict_config = ScoringConfig::default();
        strict_config.thresholds.medium = 1.0;
        strict_config.thresholds.high = 2.0;
        let strict = RiskFactorEngine::new(&strict_config).score(&low_risk_record(), None, 5000.0);
        assert_eq!(base.score, strict.score);
        assert_eq!(strict.level, RiskLevel::Alto);
    }
}

//! Batch scoring of a BOM
//!
//! Lines are scored in parallel against a read-only store; results come back
//! in input order, with unresolved part numbers as their own outcome.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::analysis::aggregate::{summarize, BomSummary};
use crate::analysis::assessment::RiskAssessment;
use crate::analysis::config::ScoringConfig;
use crate::analysis::factors::{RiskFactorEngine, ScoreContext};
use crate::analysis::graph::{DependencyGraphAnalyzer, GraphReport};
use crate::analysis::tier2::BomTier2Report;
use crate::core::store::{normalize_key, RecordStore};
use crate::entities::{Bom, BomLine, ClientOverride, DependencyEdge};

/// What to score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    pub lines: Vec<BomLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyEdge>,
}

impl BatchRequest {
    /// Plain list of part numbers, one unit each
    pub fn for_parts<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            lines: parts.into_iter().map(BomLine::new).collect(),
            ..Default::default()
        }
    }

    pub fn from_bom(bom: &Bom) -> Self {
        Self {
            lines: bom.lines.clone(),
            client_id: bom.client.clone(),
            run_rate: bom.run_rate,
            dependencies: bom.dependencies.clone(),
        }
    }

    /// Normalized part numbers that depend on another line of the request
    ///
    /// Self edges and edges naming a part outside the lines do not count.
    pub fn dependents(&self) -> BTreeSet<String> {
        let lines: BTreeSet<String> = self.lines.iter().map(|l| normalize_key(&l.part_number)).collect();
        self.dependencies
            .iter()
            .map(|e| (normalize_key(&e.dependent), normalize_key(&e.depends_on)))
            .filter(|(from, to)| from != to && lines.contains(from) && lines.contains(to))
            .map(|(from, _)| from)
            .collect()
    }
}

/// Result for one requested line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    Assessed(Box<RiskAssessment>),
    NotFound { part_number: String },
}

impl BatchOutcome {
    pub fn assessment(&self) -> Option<&RiskAssessment> {
        match self {
            BatchOutcome::Assessed(a) => Some(a),
            BatchOutcome::NotFound { .. } => None,
        }
    }

    pub fn part_number(&self) -> &str {
        match self {
            BatchOutcome::Assessed(a) => &a.part_number,
            BatchOutcome::NotFound { part_number } => part_number,
        }
    }
}

/// Complete analysis of one BOM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomAnalysis {
    pub run_rate: f64,
    /// One per requested line, in request order
    pub outcomes: Vec<BatchOutcome>,
    pub graph: GraphReport,
    pub summary: BomSummary,
    pub tier2: BomTier2Report,
}

impl BomAnalysis {
    pub fn assessments(&self) -> impl Iterator<Item = &RiskAssessment> {
        self.outcomes.iter().filter_map(BatchOutcome::assessment)
    }

    pub fn not_found(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|o| match o {
            BatchOutcome::NotFound { part_number } => Some(part_number.as_str()),
            BatchOutcome::Assessed(_) => None,
        })
    }
}

/// Scores requests against one store snapshot
pub struct BatchScorer<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    config: &'a ScoringConfig,
    engine: RiskFactorEngine<'a>,
}

impl<'a, S: RecordStore + ?Sized> BatchScorer<'a, S> {
    pub fn new(config: &'a ScoringConfig, store: &'a S) -> Self {
        Self {
            store,
            config,
            engine: RiskFactorEngine::new(config).with_materials(store.materials()),
        }
    }

    pub fn engine(&self) -> &RiskFactorEngine<'a> {
        &self.engine
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    /// Request rate, else the client's default, else the configured default
    pub fn run_rate(&self, request: &BatchRequest) -> f64 {
        request
            .run_rate
            .filter(|r| *r >= 0.0)
            .or_else(|| {
                request
                    .client_id
                    .as_deref()
                    .and_then(|id| self.store.client(id))
                    .and_then(|c| c.default_run_rate)
                    .filter(|r| *r >= 0.0)
            })
            .unwrap_or(self.config.default_run_rate)
    }

    pub(crate) fn client_override(&self, request: &BatchRequest, part_number: &str) -> Option<&'a ClientOverride> {
        request
            .client_id
            .as_deref()
            .and_then(|client| self.store.client_override(client, part_number))
    }

    pub(crate) fn context<'c>(&'c self, line: &BomLine, dependents: &BTreeSet<String>) -> ScoreContext<'c> {
        ScoreContext {
            material_links: self.store.material_links(&line.part_number),
            dependent_in_bom: dependents.contains(&normalize_key(&line.part_number)),
            bom_quantity: line.quantity,
        }
    }

    /// Score every line, preserving order
    pub fn score(&self, request: &BatchRequest) -> Vec<BatchOutcome> {
        let run_rate = self.run_rate(request);
        let dependents = request.dependents();

        if let Some(client) = request.client_id.as_deref() {
            if self.store.client(client).is_none() {
                log::warn!("Unknown client '{}', no overrides will apply", client);
            }
        }
        log::debug!("Scoring {} line(s) at run rate {}", request.lines.len(), run_rate);

        request
            .lines
            .par_iter()
            .map(|line| match self.store.component(&line.part_number) {
                Some(record) => {
                    let ctx = self.context(line, &dependents);
                    let o = self.client_override(request, &line.part_number);
                    BatchOutcome::Assessed(Box::new(self.engine.score_with(record, o, run_rate, &ctx)))
                }
                None => {
                    log::warn!("Part number '{}' not found", line.part_number);
                    BatchOutcome::NotFound {
                        part_number: line.part_number.clone(),
                    }
                }
            })
            .collect()
    }

    /// Score, propagate along dependencies and summarize
    pub fn analyze(&self, request: &BatchRequest, top_n: usize) -> BomAnalysis {
        let run_rate = self.run_rate(request);
        let mut outcomes = self.score(request);

        let graph = DependencyGraphAnalyzer::new(self.config).analyze(
            outcomes.iter_mut().filter_map(|o| match o {
                BatchOutcome::Assessed(a) => Some(a.as_mut()),
                BatchOutcome::NotFound { .. } => None,
            }),
            &request.dependencies,
        );

        let not_found = outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::NotFound { .. }))
            .count();
        let summary = summarize(
            outcomes.iter().filter_map(BatchOutcome::assessment),
            not_found,
            &self.config.thresholds,
            top_n,
        );

        let mut seen = BTreeSet::new();
        let tier2 = self.engine.tier2().bom_report(
            outcomes
                .iter()
                .filter_map(BatchOutcome::assessment)
                .filter(|a| seen.insert(normalize_key(&a.part_number)))
                .map(|a| (a.part_number.as_str(), &a.tier2)),
        );

        BomAnalysis {
            run_rate,
            outcomes,
            graph,
            summary,
            tier2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::assessment::RiskLevel;
    use crate::core::store::Snapshot;
    use crate::entities::{BufferStock, ClientRecord, ComponentRecord, FabStage, ProductionPlant};

    fn record(pn: &str, country: &str, lead: f64) -> ComponentRecord {
        let mut r = ComponentRecord::new(pn);
        r.plants = vec![ProductionPlant::new(country, FabStage::Both)];
        r.lead_time_weeks = Some(lead);
        r.alternative_sources = Some(0);
        r
    }

    fn store() -> Snapshot {
        let mut units = record("UNITS", "Japan", 4.0);
        units.buffer_stock = Some(BufferStock::units(10_000.0));
        let mut o = ClientOverride::new("ACME", "B");
        o.lead_time_weeks = Some(2.0);
        let mut client = ClientRecord::new("ACME");
        client.default_run_rate = Some(1000.0);

        Snapshot::new()
            .with_component(record("A", "Germany", 4.0))
            .with_component(record("B", "Taiwan", 20.0))
            .with_component(record("C", "China", 18.0))
            .with_component(units)
            .with_client(client)
            .with_override(o)
    }

    #[test]
    fn test_order_preserved_with_not_found() {
        let config = ScoringConfig::default();
        let store = store();
        let scorer = BatchScorer::new(&config, &store);
        let outcomes = scorer.score(&BatchRequest::for_parts(["C", "MISSING", "a", "B"]));

        let order: Vec<&str> = outcomes.iter().map(|o| o.part_number()).collect();
        // assessed lines report the record's part number, unresolved ones the request's
        assert_eq!(order, vec!["C", "MISSING", "A", "B"]);
        assert!(matches!(outcomes[1], BatchOutcome::NotFound { .. }));
        assert_eq!(outcomes[2].assessment().unwrap().part_number, "A");
    }

    #[test]
    fn test_run_rate_resolution() {
        let config = ScoringConfig::default();
        let store = store();
        let scorer = BatchScorer::new(&config, &store);

        let mut request = BatchRequest::for_parts(["UNITS"]);
        assert_eq!(scorer.run_rate(&request), 5000.0);
        request.client_id = Some("acme".to_string());
        assert_eq!(scorer.run_rate(&request), 1000.0);
        request.run_rate = Some(2500.0);
        assert_eq!(scorer.run_rate(&request), 2500.0);

        let outcomes = scorer.score(&request);
        assert_eq!(outcomes[0].assessment().unwrap().buffer_weeks, Some(4.0));
    }

    #[test]
    fn test_client_override_applies() {
        let config = ScoringConfig::default();
        let store = store();
        let scorer = BatchScorer::new(&config, &store);

        let plain = scorer.score(&BatchRequest::for_parts(["B"]));
        let mut request = BatchRequest::for_parts(["B"]);
        request.client_id = Some("ACME".to_string());
        let with_client = scorer.score(&request);

        let before = plain[0].assessment().unwrap();
        let after = with_client[0].assessment().unwrap();
        assert!(after.score < before.score);
    }

    #[test]
    fn test_analyze_bom_with_dependencies() {
        let config = ScoringConfig::default();
        let store = store();
        let scorer = BatchScorer::new(&config, &store);
        let request = BatchRequest {
            lines: vec![
                BomLine::new("A"),
                BomLine::new("B"),
                BomLine::new("C"),
                BomLine::new("NOPE"),
            ],
            dependencies: vec![DependencyEdge::new("A", "B"), DependencyEdge::new("C", "B")],
            ..Default::default()
        };

        let analysis = scorer.analyze(&request, 3);
        assert_eq!(analysis.outcomes.len(), 4);
        assert_eq!(analysis.summary.not_found, 1);
        assert_eq!(analysis.not_found().collect::<Vec<_>>(), vec!["NOPE"]);

        let a = analysis.outcomes[0].assessment().unwrap();
        let b = analysis.outcomes[1].assessment().unwrap();
        // A is a dependent in the BOM
        assert_eq!(a.points(crate::analysis::assessment::Factor::Dependency), 10.0);
        assert_eq!(b.points(crate::analysis::assessment::Factor::Dependency), 0.0);
        assert!(b.spof);
        assert_eq!(analysis.summary.spof_count, 1);
        assert!(a.effective_score() >= a.score);
        assert_eq!(b.effective_level(), RiskLevel::Alto);
        assert_eq!(analysis.tier2.component_count, 3);
    }

    #[test]
    fn test_invalid_edges_do_not_count_as_dependencies() {
        use crate::analysis::assessment::Factor;
        use crate::analysis::graph::GraphIssue;

        let config = ScoringConfig::default();
        let store = store();
        let scorer = BatchScorer::new(&config, &store);

        for edge in [DependencyEdge::new("A", "GHOST"), DependencyEdge::new("A", "a")] {
            let request = BatchRequest {
                lines: vec![BomLine::new("A")],
                dependencies: vec![edge],
                ..Default::default()
            };
            assert!(request.dependents().is_empty());

            let analysis = scorer.analyze(&request, 3);
            assert_eq!(analysis.graph.issues.len(), 1);
            assert!(matches!(
                analysis.graph.issues[0],
                GraphIssue::DanglingEdge { .. } | GraphIssue::SelfDependency { .. }
            ));
            let a = analysis.outcomes[0].assessment().unwrap();
            assert_eq!(a.points(Factor::Dependency), 0.0);
        }
    }
}

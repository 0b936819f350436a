//! Dependency graph analysis
//!
//! Propagates risk along the functional dependency edges of one BOM and flags
//! single points of failure. The graph is treated as a general directed
//! graph: cycles are detected during the traversal and reported, never
//! followed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::analysis::assessment::{ChainRisk, RiskAssessment, RiskLevel};
use crate::analysis::config::{LevelThresholds, ScoringConfig};
use crate::core::store::normalize_key;
use crate::entities::DependencyEdge;

/// A structural problem found in a BOM's dependency edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphIssue {
    /// Nodes forming a cycle, in traversal order
    Cycle { members: Vec<String> },
    /// Edge naming a part that is not in the BOM
    DanglingEdge { from: String, to: String },
    SelfDependency { part_number: String },
}

impl std::fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphIssue::Cycle { members } => {
                let mut path = members.clone();
                if let Some(first) = members.first() {
                    path.push(first.clone());
                }
                write!(f, "dependency cycle: {}", path.join(" -> "))
            }
            GraphIssue::DanglingEdge { from, to } => {
                write!(f, "edge {} -> {} names a part outside the BOM", from, to)
            }
            GraphIssue::SelfDependency { part_number } => {
                write!(f, "{} depends on itself", part_number)
            }
        }
    }
}

/// A single point of failure and what it takes down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpofReport {
    pub part_number: String,
    pub score: f64,
    pub direct_dependents: Vec<String>,
    /// Every part reachable through reverse edges
    pub affected: Vec<String>,
}

/// Result of analyzing one BOM's graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphReport {
    pub node_count: usize,
    /// Valid, deduplicated edges (dependent, depended-upon)
    pub edges: Vec<(String, String)>,
    pub issues: Vec<GraphIssue>,
    /// Most affected parts first
    pub spofs: Vec<SpofReport>,
}

impl GraphReport {
    pub fn cycles(&self) -> impl Iterator<Item = &[String]> {
        self.issues.iter().filter_map(|i| match i {
            GraphIssue::Cycle { members } => Some(members.as_slice()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

pub struct DependencyGraphAnalyzer {
    decay: f64,
    thresholds: LevelThresholds,
}

impl DependencyGraphAnalyzer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            decay: config.chain.decay,
            thresholds: config.thresholds.clone(),
        }
    }

    /// Add chain risk and SPOF flags to a BOM's assessments
    ///
    /// Assessments sharing a part number are one node; each receives the
    /// node's chain values.
    pub fn analyze<'r>(
        &self,
        assessments: impl IntoIterator<Item = &'r mut RiskAssessment>,
        edges: &[DependencyEdge],
    ) -> GraphReport {
        let mut assessments: Vec<&mut RiskAssessment> = assessments.into_iter().collect();

        // Node table
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        let mut names: Vec<String> = Vec::new();
        let mut own: Vec<f64> = Vec::new();
        let mut maximal: Vec<bool> = Vec::new();
        let mut members: Vec<usize> = Vec::with_capacity(assessments.len());
        for a in assessments.iter() {
            let key = normalize_key(&a.part_number);
            let node = *index.entry(key).or_insert_with(|| {
                names.push(a.part_number.clone());
                own.push(a.score);
                maximal.push(false);
                names.len() - 1
            });
            own[node] = own[node].max(a.score);
            maximal[node] |= a.single_source_maximal;
            members.push(node);
        }
        let n = names.len();

        // Edges
        let mut issues = Vec::new();
        let mut deps: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        for edge in edges {
            let from = index.get(&normalize_key(&edge.dependent)).copied();
            let to = index.get(&normalize_key(&edge.depends_on)).copied();
            match (from, to) {
                (Some(f), Some(t)) if f == t => {
                    log::warn!("{} depends on itself, edge ignored", names[f]);
                    issues.push(GraphIssue::SelfDependency {
                        part_number: names[f].clone(),
                    });
                }
                (Some(f), Some(t)) => {
                    deps[f].insert(t);
                }
                _ => {
                    log::warn!(
                        "Dependency {} -> {} names a part outside the BOM, edge ignored",
                        edge.dependent,
                        edge.depends_on
                    );
                    issues.push(GraphIssue::DanglingEdge {
                        from: edge.dependent.clone(),
                        to: edge.depends_on.clone(),
                    });
                }
            }
        }
        let deps: Vec<Vec<usize>> = deps.into_iter().map(|d| d.into_iter().collect()).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (from, targets) in deps.iter().enumerate() {
            for &to in targets {
                dependents[to].push(from);
            }
        }

        // Post-order traversal; a back edge closes a cycle and is not followed
        let mut state = vec![Visit::Unvisited; n];
        let mut chain = own.clone();
        let mut inherited: Vec<Option<usize>> = vec![None; n];
        let mut seen_cycles: BTreeSet<Vec<usize>> = BTreeSet::new();

        for start in 0..n {
            if state[start] != Visit::Unvisited {
                continue;
            }
            state[start] = Visit::InProgress;
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

            while let Some(&(node, next)) = stack.last() {
                if let Some(&dep) = deps[node].get(next) {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    match state[dep] {
                        Visit::Unvisited => {
                            state[dep] = Visit::InProgress;
                            stack.push((dep, 0));
                        }
                        Visit::InProgress => {
                            let pos = stack.iter().position(|(s, _)| *s == dep).unwrap_or(0);
                            let cycle: Vec<usize> = stack[pos..].iter().map(|(s, _)| *s).collect();
                            let mut key = cycle.clone();
                            key.sort_unstable();
                            if seen_cycles.insert(key) {
                                let cycle_names: Vec<String> =
                                    cycle.iter().map(|&i| names[i].clone()).collect();
                                log::warn!("Dependency cycle: {}", cycle_names.join(" -> "));
                                issues.push(GraphIssue::Cycle {
                                    members: cycle_names,
                                });
                            }
                        }
                        Visit::Done => {}
                    }
                    continue;
                }

                let mut best = own[node];
                let mut from = None;
                for &dep in &deps[node] {
                    if state[dep] != Visit::Done {
                        continue;
                    }
                    let propagated = self.decay * chain[dep];
                    if propagated > best {
                        best = propagated;
                        from = Some(dep);
                    }
                }
                chain[node] = best;
                inherited[node] = from;
                state[node] = Visit::Done;
                stack.pop();
            }
        }

        // Write back
        for (a, &node) in assessments.iter_mut().zip(&members) {
            let score = (chain[node] * 100.0).round() / 100.0;
            a.chain = Some(ChainRisk {
                score,
                level: RiskLevel::classify(score, &self.thresholds),
                inherited_from: inherited[node].map(|i| names[i].clone()),
                depends_on: deps[node].iter().map(|&i| names[i].clone()).collect(),
                dependents: dependents[node].iter().map(|&i| names[i].clone()).collect(),
            });
            a.spof = maximal[node] && !dependents[node].is_empty();
        }

        let mut spofs: Vec<SpofReport> = (0..n)
            .filter(|&i| maximal[i] && !dependents[i].is_empty())
            .map(|i| SpofReport {
                part_number: names[i].clone(),
                score: own[i],
                direct_dependents: dependents[i].iter().map(|&d| names[d].clone()).collect(),
                affected: transitive_dependents(i, &dependents)
                    .into_iter()
                    .map(|d| names[d].clone())
                    .collect(),
            })
            .collect();
        spofs.sort_by(|a, b| {
            b.affected
                .len()
                .cmp(&a.affected.len())
                .then(b.score.total_cmp(&a.score))
                .then(a.part_number.cmp(&b.part_number))
        });

        log::debug!(
            "Graph analysis: {} node(s), {} issue(s), {} SPOF(s)",
            n,
            issues.len(),
            spofs.len()
        );

        GraphReport {
            node_count: n,
            edges: deps
                .iter()
                .enumerate()
                .flat_map(|(f, targets)| targets.iter().map(move |&t| (f, t)))
                .map(|(f, t)| (names[f].clone(), names[t].clone()))
                .collect(),
            issues,
            spofs,
        }
    }
}

/// Nodes that depend on `node`, directly or not
fn transitive_dependents(node: usize, dependents: &[Vec<usize>]) -> Vec<usize> {
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<usize> = dependents[node].iter().copied().collect();
    while let Some(next) = queue.pop_front() {
        if next == node || !seen.insert(next) {
            continue;
        }
        queue.extend(dependents[next].iter().copied());
    }
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::factors::RiskFactorEngine;
    use crate::entities::{ComponentRecord, FabStage, ProductionPlant};

    fn assessment(pn: &str, score: f64, maximal: bool) -> RiskAssessment {
        let config = ScoringConfig::default();
        let mut a = RiskFactorEngine::new(&config).score(&ComponentRecord::new(pn), None, 1.0);
        a.score = score;
        a.level = RiskLevel::classify(score, &config.thresholds);
        a.single_source_maximal = maximal;
        a
    }

    fn edge(from: &str, to: &str) -> DependencyEdge {
        DependencyEdge {
            dependent: from.to_string(),
            depends_on: to.to_string(),
        }
    }

    fn chain(a: &RiskAssessment) -> &ChainRisk {
        a.chain.as_ref().unwrap()
    }

    #[test]
    fn test_chain_propagates_with_decay() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut items = vec![
            assessment("A", 10.0, false),
            assessment("B", 20.0, false),
            assessment("C", 80.0, false),
        ];
        let report = analyzer.analyze(items.iter_mut(), &[edge("A", "B"), edge("B", "C")]);

        assert!(report.issues.is_empty());
        assert_eq!(chain(&items[2]).score, 80.0);
        assert_eq!(chain(&items[1]).score, 68.0);
        assert_eq!(chain(&items[0]).score, 57.8);
        assert_eq!(chain(&items[0]).level, RiskLevel::Alto);
        assert_eq!(chain(&items[0]).inherited_from.as_deref(), Some("B"));
        // own scores are untouched
        assert_eq!(items[0].score, 10.0);
    }

    #[test]
    fn test_own_score_wins_when_higher() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut items = vec![assessment("A", 70.0, false), assessment("B", 50.0, false)];
        analyzer.analyze(items.iter_mut(), &[edge("A", "B")]);
        assert_eq!(chain(&items[0]).score, 70.0);
        assert_eq!(chain(&items[0]).inherited_from, None);
    }

    #[test]
    fn test_spof_needs_maximal_single_source_and_dependents() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut items = vec![
            assessment("A", 20.0, false),
            assessment("B", 10.0, true),
            assessment("C", 30.0, true),
            assessment("D", 20.0, false),
        ];
        let report = analyzer.analyze(
            items.iter_mut(),
            &[edge("A", "B"), edge("D", "B"), edge("B", "C")],
        );

        // B is low-risk but an unreplicated hub
        assert!(items[1].spof);
        assert_eq!(chain(&items[1]).dependents, vec!["A", "D"]);
        // C has one dependent (B) and is maximal too
        assert!(items[2].spof);
        assert!(!items[0].spof);
        assert!(!items[3].spof);

        assert_eq!(report.spofs.len(), 2);
        assert_eq!(report.spofs[0].part_number, "C");
        assert_eq!(report.spofs[0].affected, vec!["A", "B", "D"]);
        assert_eq!(report.spofs[1].part_number, "B");
    }

    #[test]
    fn test_node_with_alternatives_is_never_spof() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut hub = ComponentRecord::new("HUB");
        hub.plants = vec![ProductionPlant::new("Taiwan", FabStage::Both)];
        hub.alternative_sources = Some(1);
        let engine = RiskFactorEngine::new(&config);

        let mut items = vec![
            engine.score(&hub, None, 1.0),
            assessment("X", 10.0, false),
            assessment("Y", 10.0, false),
        ];
        analyzer.analyze(items.iter_mut(), &[edge("X", "HUB"), edge("Y", "HUB")]);
        assert!(!items[0].spof);
    }

    #[test]
    fn test_hub_with_unknown_alternatives_is_not_spof() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut hub = ComponentRecord::new("HUB");
        hub.plants = vec![ProductionPlant::new("Germany", FabStage::Both)];
        let engine = RiskFactorEngine::new(&config);

        let mut items = vec![engine.score(&hub, None, 1.0), assessment("X", 10.0, false)];
        assert!(!items[0].single_source_maximal);
        let report = analyzer.analyze(items.iter_mut(), &[edge("X", "HUB")]);
        assert!(!items[0].spof);
        assert!(report.spofs.is_empty());

        hub.alternative_sources = Some(0);
        let mut items = vec![engine.score(&hub, None, 1.0), assessment("X", 10.0, false)];
        analyzer.analyze(items.iter_mut(), &[edge("X", "HUB")]);
        assert!(items[0].spof);
    }

    #[test]
    fn test_cycle_is_reported_and_propagation_completes() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut items = vec![
            assessment("A", 10.0, false),
            assessment("B", 20.0, false),
            assessment("C", 40.0, false),
        ];
        let report = analyzer.analyze(
            items.iter_mut(),
            &[edge("A", "B"), edge("B", "C"), edge("C", "A")],
        );

        let cycles: Vec<&[String]> = report.cycles().collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], ["A", "B", "C"]);
        assert!(items.iter().all(|a| a.chain.is_some()));
        // C's edge back to A is truncated
        assert_eq!(chain(&items[2]).score, 40.0);
        assert_eq!(chain(&items[1]).score, 34.0);
        assert_eq!(chain(&items[0]).score, 28.9);
    }

    #[test]
    fn test_two_node_cycle_reported_once() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut items = vec![assessment("A", 10.0, false), assessment("B", 20.0, false)];
        let report = analyzer.analyze(items.iter_mut(), &[edge("A", "B"), edge("B", "A")]);
        assert_eq!(report.cycles().count(), 1);
    }

    #[test]
    fn test_bad_edges_become_issues() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut items = vec![assessment("A", 10.0, false)];
        let report = analyzer.analyze(items.iter_mut(), &[edge("A", "A"), edge("A", "GHOST")]);
        assert!(report.issues.contains(&GraphIssue::SelfDependency {
            part_number: "A".to_string()
        }));
        assert!(report.issues.contains(&GraphIssue::DanglingEdge {
            from: "A".to_string(),
            to: "GHOST".to_string()
        }));
        assert!(report.edges.is_empty());
        assert_eq!(chain(&items[0]).score, 10.0);
    }

    #[test]
    fn test_duplicate_parts_share_a_node() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let mut items = vec![
            assessment("a", 10.0, false),
            assessment("B", 60.0, false),
            assessment(" A ", 15.0, false),
        ];
        let report = analyzer.analyze(items.iter_mut(), &[edge("A", "b"), edge("A", "B")]);
        assert_eq!(report.node_count, 2);
        assert_eq!(report.edges.len(), 1);
        assert_eq!(chain(&items[0]).score, 51.0);
        assert_eq!(chain(&items[2]).score, 51.0);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let config = ScoringConfig::default();
        let analyzer = DependencyGraphAnalyzer::new(&config);
        let n = 20_000;
        let mut items: Vec<RiskAssessment> = (0..n)
            .map(|i| assessment(&format!("P{}", i), 0.0, false))
            .collect();
        items[n - 1].score = 90.0;
        let edges: Vec<DependencyEdge> = (0..n - 1)
            .map(|i| edge(&format!("P{}", i), &format!("P{}", i + 1)))
            .collect();
        let report = analyzer.analyze(items.iter_mut(), &edges);
        assert!(report.issues.is_empty());
        assert_eq!(chain(&items[n - 2]).score, 76.5);
        assert!(chain(&items[0]).score >= 0.0);
    }

    #[test]
    fn test_cycle_display() {
        let issue = GraphIssue::Cycle {
            members: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(issue.to_string(), "dependency cycle: A -> B -> A");
    }
}

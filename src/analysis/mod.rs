//! Risk analysis - scoring, propagation and simulation
//!
//! Every engine takes an explicit [`ScoringConfig`]; nothing here reads
//! global state or touches the filesystem.

pub mod aggregate;
pub mod assessment;
pub mod batch;
pub mod config;
pub mod country;
pub mod factors;
pub mod graph;
pub mod render;
pub mod switching;
pub mod tier2;
pub mod whatif;

pub use aggregate::{summarize, BomSummary, LevelDistribution, RankedComponent};
pub use assessment::{
    ChainRisk, DataIssue, Factor, FactorScore, RiskAssessment, RiskLevel, Suggestion,
};
pub use batch::{BatchOutcome, BatchRequest, BatchScorer, BomAnalysis};
pub use config::{ConfigError, ScoringConfig};
pub use country::{CountryRiskTable, Stage};
pub use factors::{RiskFactorEngine, ScoreContext};
pub use graph::{DependencyGraphAnalyzer, GraphIssue, GraphReport, SpofReport};
pub use switching::{switching_cost, SwitchingClass, SwitchingCost};
pub use tier2::{BomTier2Report, MaterialCatalog, Tier2MaterialScorer, Tier2Result};
pub use whatif::{ComponentImpact, Scenario, WhatIfReport, WhatIfSimulator, WhatIfSummary};

//! BOM-level roll-up of component assessments

use serde::{Deserialize, Serialize};

use crate::analysis::assessment::{RiskAssessment, RiskLevel};
use crate::analysis::config::LevelThresholds;

/// Count of components per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub alto: usize,
    pub medio: usize,
    pub basso: usize,
}

impl LevelDistribution {
    pub fn add(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Alto => self.alto += 1,
            RiskLevel::Medio => self.medio += 1,
            RiskLevel::Basso => self.basso += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.alto + self.medio + self.basso
    }
}

/// Short line for top-N listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedComponent {
    pub part_number: String,
    pub score: f64,
    pub level: RiskLevel,
    pub spof: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomSummary {
    pub component_count: usize,
    pub not_found: usize,
    /// By effective (chain-adjusted) level
    pub distribution: LevelDistribution,
    /// Mean of effective scores
    pub average_score: f64,
    /// Value-weighted mean, or the plain mean when no line has a price
    pub bom_score: f64,
    pub bom_level: RiskLevel,
    pub value_weighted: bool,
    pub max_chain_score: f64,
    pub total_value: f64,
    pub spof_count: usize,
    pub top: Vec<RankedComponent>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Roll assessments up into one BOM summary
pub fn summarize<'r>(
    assessments: impl IntoIterator<Item = &'r RiskAssessment>,
    not_found: usize,
    thresholds: &LevelThresholds,
    top_n: usize,
) -> BomSummary {
    let assessments: Vec<&RiskAssessment> = assessments.into_iter().collect();

    let mut distribution = LevelDistribution::default();
    let mut sum = 0.0;
    let mut weighted_sum = 0.0;
    let mut total_value = 0.0;
    let mut max_chain_score = 0.0_f64;

    for a in &assessments {
        let score = a.effective_score();
        distribution.add(a.effective_level());
        sum += score;
        let value = a.line_value();
        weighted_sum += score * value;
        total_value += value;
        max_chain_score = max_chain_score.max(score);
    }

    let count = assessments.len();
    let average_score = if count > 0 { sum / count as f64 } else { 0.0 };
    let value_weighted = total_value > 0.0;
    let bom_score = if value_weighted {
        weighted_sum / total_value
    } else {
        average_score
    };

    let mut ranked: Vec<&RiskAssessment> = assessments.clone();
    ranked.sort_by(|a, b| {
        b.effective_score()
            .total_cmp(&a.effective_score())
            .then(a.part_number.cmp(&b.part_number))
    });
    let top = ranked
        .into_iter()
        .take(top_n)
        .map(|a| RankedComponent {
            part_number: a.part_number.clone(),
            score: a.effective_score(),
            level: a.effective_level(),
            spof: a.spof,
        })
        .collect();

    BomSummary {
        component_count: count,
        not_found,
        distribution,
        average_score: round2(average_score),
        bom_score: round2(bom_score),
        bom_level: RiskLevel::classify(round2(bom_score), thresholds),
        value_weighted,
        max_chain_score,
        total_value: round2(total_value),
        spof_count: assessments.iter().filter(|a| a.spof).count(),
        top,
    }
}

//! Assessment output types

use serde::{Deserialize, Serialize};

use crate::analysis::config::LevelThresholds;
use crate::analysis::switching::SwitchingCost;
use crate::analysis::tier2::Tier2Result;

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Basso,
    Medio,
    Alto,
}

impl RiskLevel {
    /// Classify a 0-100 score
    pub fn classify(score: f64, thresholds: &LevelThresholds) -> Self {
        if score >= thresholds.high {
            RiskLevel::Alto
        } else if score >= thresholds.medium {
            RiskLevel::Medio
        } else {
            RiskLevel::Basso
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Alto => write!(f, "ALTO"),
            RiskLevel::Medio => write!(f, "MEDIO"),
            RiskLevel::Basso => write!(f, "BASSO"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alto" | "high" => Ok(RiskLevel::Alto),
            "medio" | "medium" => Ok(RiskLevel::Medio),
            "basso" | "low" => Ok(RiskLevel::Basso),
            _ => Err(format!("Invalid risk level: {}. Use ALTO, MEDIO, or BASSO", s)),
        }
    }
}

/// A scored risk dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Geographic,
    SingleSource,
    LeadTime,
    BufferStock,
    Dependency,
    Proprietary,
    Certification,
    EolStatus,
    AlternativeSources,
    FinancialHealth,
    Allocation,
    PriceIncrease,
    Package,
    TechnologyNode,
    MaterialConcentration,
}

impl Factor {
    /// Whether the factor belongs to the weighted base set
    pub fn is_base(self) -> bool {
        matches!(
            self,
            Factor::Geographic
                | Factor::SingleSource
                | Factor::LeadTime
                | Factor::BufferStock
                | Factor::Dependency
                | Factor::Proprietary
                | Factor::Certification
        )
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Factor::Geographic => "geographic",
            Factor::SingleSource => "single_source",
            Factor::LeadTime => "lead_time",
            Factor::BufferStock => "buffer_stock",
            Factor::Dependency => "dependency",
            Factor::Proprietary => "proprietary",
            Factor::Certification => "certification",
            Factor::EolStatus => "eol_status",
            Factor::AlternativeSources => "alternative_sources",
            Factor::FinancialHealth => "financial_health",
            Factor::Allocation => "allocation",
            Factor::PriceIncrease => "price_increase",
            Factor::Package => "package",
            Factor::TechnologyNode => "technology_node",
            Factor::MaterialConcentration => "material_concentration",
        };
        write!(f, "{}", s)
    }
}

/// Points one factor contributed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: Factor,
    /// May be negative for credits (several alternatives)
    pub points: f64,
    pub detail: String,
}

/// Mitigation proposed for a material factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub factor: Factor,
    pub action: String,
    /// Estimated effort in man-hours
    pub effort_hours: u32,
}

/// A data-quality note attached to an assessment
///
/// Never an error: scoring proceeds with neutral defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    MissingData { field: String },
    UnknownReference { reference: String, value: String },
    InvalidValue { field: String, value: String },
}

impl DataIssue {
    pub fn missing(field: impl Into<String>) -> Self {
        DataIssue::MissingData {
            field: field.into(),
        }
    }

    pub fn unknown(reference: impl Into<String>, value: impl Into<String>) -> Self {
        DataIssue::UnknownReference {
            reference: reference.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for DataIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataIssue::MissingData { field } => write!(f, "missing {}", field),
            DataIssue::UnknownReference { reference, value } => {
                write!(f, "unknown {} '{}'", reference, value)
            }
            DataIssue::InvalidValue { field, value } => {
                write!(f, "invalid {} '{}' (ignored)", field, value)
            }
        }
    }
}

/// Chain-adjusted risk from dependency propagation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRisk {
    pub score: f64,
    pub level: RiskLevel,
    /// Dependency the propagated score came from, when it exceeds the own score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependents: Vec<String>,
}

/// Result of scoring one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub part_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Composite score, 0-100
    pub score: f64,

    pub level: RiskLevel,

    /// Every evaluated factor, in evaluation order
    pub factors: Vec<FactorScore>,

    /// Ordered by contribution, largest first
    pub suggestions: Vec<Suggestion>,

    /// Sum of suggestion effort
    pub mitigation_hours: u32,

    /// Buffer stock expressed in weeks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_weeks: Option<f64>,

    /// Buffer weeks over effective lead time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_ratio: Option<f64>,

    /// One plant and no alternative source
    pub single_source_maximal: bool,

    pub tier2: Tier2Result,

    pub switching: SwitchingCost,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    /// Units per board in the scored context
    pub quantity: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DataIssue>,

    /// Set by dependency analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<ChainRisk>,

    /// Set by dependency analysis
    #[serde(default)]
    pub spof: bool,
}

impl RiskAssessment {
    /// Chain-adjusted score when available, otherwise the own score
    pub fn effective_score(&self) -> f64 {
        self.chain.as_ref().map_or(self.score, |c| c.score)
    }

    pub fn effective_level(&self) -> RiskLevel {
        self.chain.as_ref().map_or(self.level, |c| c.level)
    }

    pub fn factor(&self, factor: Factor) -> Option<&FactorScore> {
        self.factors.iter().find(|f| f.factor == factor)
    }

    /// Points of one factor (0 when absent)
    pub fn points(&self, factor: Factor) -> f64 {
        self.factor(factor).map_or(0.0, |f| f.points)
    }

    /// Sum of the weighted base factors
    pub fn base_score(&self) -> f64 {
        self.factors
            .iter()
            .filter(|f| f.factor.is_base())
            .map(|f| f.points)
            .sum()
    }

    /// The factor with the largest contribution
    pub fn top_factor(&self) -> Option<&FactorScore> {
        self.factors
            .iter()
            .filter(|f| f.points > 0.0)
            .max_by(|a, b| a.points.total_cmp(&b.points))
    }

    /// Line value for value-weighted aggregation
    pub fn line_value(&self) -> f64 {
        self.unit_price.unwrap_or(0.0) * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_classification_boundaries() {
        let t = LevelThresholds::default();
        assert_eq!(RiskLevel::classify(55.0, &t), RiskLevel::Alto);
        assert_eq!(RiskLevel::classify(54.99, &t), RiskLevel::Medio);
        assert_eq!(RiskLevel::classify(30.0, &t), RiskLevel::Medio);
        assert_eq!(RiskLevel::classify(29.99, &t), RiskLevel::Basso);
        assert_eq!(RiskLevel::classify(0.0, &t), RiskLevel::Basso);
    }

    #[test]
    fn test_level_ordering() {
        assert!(RiskLevel::Alto > RiskLevel::Medio);
        assert!(RiskLevel::Medio > RiskLevel::Basso);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("alto".parse::<RiskLevel>().unwrap(), RiskLevel::Alto);
        assert_eq!("Medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medio);
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_data_issue_display() {
        assert_eq!(DataIssue::missing("lead_time_weeks").to_string(), "missing lead_time_weeks");
        assert_eq!(
            DataIssue::unknown("country", "Atlantis").to_string(),
            "unknown country 'Atlantis'"
        );
    }
}

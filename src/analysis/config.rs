//! Scoring configuration
//!
//! Every weight, tier, table and threshold the engines use lives here. The
//! `Default` values are the reference calibration; every struct is
//! `serde(default)` so a partial YAML document only overrides what it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::country::CountryRiskTable;
use crate::analysis::switching::SwitchingSettings;
use crate::entities::{Category, CriticalMaterial, Criticality, NodeTier, NodeTierBounds, Substitutability};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("chain decay must be within (0, 1), got {0}")]
    InvalidDecay(f64),

    #[error("medium threshold ({medium}) must be below high threshold ({high})")]
    ThresholdOrder { medium: f64, high: f64 },

    #[error("buffer coverage tiers must satisfy 0 < critical ({critical}) < safe ({safe})")]
    BufferTierOrder { critical: f64, safe: f64 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("geographic stage shares must sum to 1, got {0}")]
    StageShares(f64),

    #[error("failed to parse scoring configuration: {0}")]
    Parse(String),
}

/// Score boundaries between levels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    /// Scores at or above this are ALTO
    pub high: f64,
    /// Scores at or above this (and below `high`) are MEDIO
    pub medium: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            high: 55.0,
            medium: 30.0,
        }
    }
}

/// Maximum contribution of each base factor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub geographic: f64,
    pub single_source: f64,
    pub lead_time: f64,
    pub buffer_stock: f64,
    pub dependency: f64,
    pub proprietary: f64,
    pub certification: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            geographic: 25.0,
            single_source: 20.0,
            lead_time: 15.0,
            buffer_stock: 15.0,
            dependency: 10.0,
            proprietary: 10.0,
            certification: 5.0,
        }
    }
}

impl FactorWeights {
    pub fn total(&self) -> f64 {
        self.geographic
            + self.single_source
            + self.lead_time
            + self.buffer_stock
            + self.dependency
            + self.proprietary
            + self.certification
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeographicSettings {
    pub frontend_share: f64,
    pub backend_share: f64,
    /// Country weight that maps to full frontend risk
    pub frontend_scale: f64,
    /// Country weight that maps to full backend risk
    pub backend_scale: f64,
    /// Multiplier by number of distinct countries in a stage (1, 2, 3+)
    pub spread_multipliers: Vec<f64>,
}

impl Default for GeographicSettings {
    fn default() -> Self {
        Self {
            frontend_share: 0.6,
            backend_share: 0.4,
            frontend_scale: 25.0,
            backend_scale: 15.0,
            spread_multipliers: vec![1.0, 0.75, 0.6],
        }
    }
}

impl GeographicSettings {
    pub fn spread_multiplier(&self, countries: usize) -> f64 {
        if countries == 0 {
            return 0.0;
        }
        let idx = (countries - 1).min(self.spread_multipliers.len().saturating_sub(1));
        self.spread_multipliers.get(idx).copied().unwrap_or(1.0)
    }
}

/// Single-source fractions of the factor weight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleSourceSettings {
    pub one_plant: f64,
    pub two_plants: f64,
    /// Applied when exactly one alternative part exists
    pub one_alternative: f64,
    /// Applied when two or more alternative parts exist
    pub many_alternatives: f64,
}

impl Default for SingleSourceSettings {
    fn default() -> Self {
        Self {
            one_plant: 1.0,
            two_plants: 0.5,
            one_alternative: 0.75,
            many_alternatives: 0.5,
        }
    }
}

/// A step applied when a value is strictly above `above`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub above: f64,
    pub value: f64,
}

/// A band applied when a value is at least `at_least`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Band {
    pub at_least: f64,
    pub points: f64,
}

/// Value of the highest step exceeded, or 0
pub fn step_value(steps: &[Step], x: f64) -> f64 {
    steps
        .iter()
        .filter(|s| x > s.above)
        .max_by(|a, b| a.above.total_cmp(&b.above))
        .map(|s| s.value)
        .unwrap_or(0.0)
}

/// Points of the highest band reached, or 0
pub fn band_points(bands: &[Band], x: f64) -> f64 {
    bands
        .iter()
        .filter(|b| x >= b.at_least)
        .max_by(|a, b| a.at_least.total_cmp(&b.at_least))
        .map(|b| b.points)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadTimeSettings {
    /// Fraction of the weight applied above each lead time (weeks)
    pub tiers: Vec<Step>,
}

impl Default for LeadTimeSettings {
    fn default() -> Self {
        Self {
            tiers: vec![
                Step {
                    above: 16.0,
                    value: 1.0,
                },
                Step {
                    above: 10.0,
                    value: 10.0 / 15.0,
                },
                Step {
                    above: 6.0,
                    value: 5.0 / 15.0,
                },
            ],
        }
    }
}

/// Buffer coverage tiers, as a ratio of buffer weeks to lead time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferSettings {
    /// Below this ratio the full weight applies
    pub critical_coverage: f64,
    /// At or above this ratio no points apply
    pub safe_coverage: f64,
    /// Fraction of the weight applied exactly at `critical_coverage`,
    /// decreasing linearly to 0 at `safe_coverage`
    pub partial_ceiling: f64,
}

impl Default for BufferSettings {
    fn default() -> Self {
        Self {
            critical_coverage: 1.0,
            safe_coverage: 1.5,
            partial_ceiling: 8.0 / 15.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProprietarySettings {
    pub proprietary: f64,
    pub non_commodity: f64,
}

impl Default for ProprietarySettings {
    fn default() -> Self {
        Self {
            proprietary: 1.0,
            non_commodity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationSettings {
    /// Requalification longer than this triggers the factor
    pub threshold_weeks: f64,
}

impl Default for CertificationSettings {
    fn default() -> Self {
        Self {
            threshold_weeks: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EolPoints {
    pub nrnd: f64,
    pub last_buy: f64,
    pub eol: f64,
    pub obsolete: f64,
}

impl Default for EolPoints {
    fn default() -> Self {
        Self {
            nrnd: 8.0,
            last_buy: 12.0,
            eol: 15.0,
            obsolete: 15.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternativePoints {
    pub none: f64,
    pub single: f64,
    /// Subtracted when several alternatives exist
    pub multiple_credit: f64,
}

impl Default for AlternativePoints {
    fn default() -> Self {
        Self {
            none: 10.0,
            single: 5.0,
            multiple_credit: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialPoints {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for FinancialPoints {
    fn default() -> Self {
        Self {
            a: 0.0,
            b: 2.0,
            c: 5.0,
            d: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPoints {
    pub constrained: f64,
    pub allocated: f64,
}

impl Default for AllocationPoints {
    fn default() -> Self {
        Self {
            constrained: 5.0,
            allocated: 10.0,
        }
    }
}

/// Points applied when the node is at or below `max_nm`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePoints {
    pub max_nm: f64,
    pub points: f64,
}

/// Additive lifecycle and market factors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleSettings {
    pub eol: EolPoints,
    pub alternatives: AlternativePoints,
    pub financial: FinancialPoints,
    pub allocation: AllocationPoints,
    /// Points by most recent price increase (percent)
    pub price_increase: Vec<Step>,
    /// Package families with concentrated assembly capacity
    pub advanced_packages: Vec<String>,
    pub package_points: f64,
    pub technology_node: Vec<NodePoints>,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            eol: EolPoints::default(),
            alternatives: AlternativePoints::default(),
            financial: FinancialPoints::default(),
            allocation: AllocationPoints::default(),
            price_increase: vec![
                Step {
                    above: 50.0,
                    value: 5.0,
                },
                Step {
                    above: 20.0,
                    value: 3.0,
                },
            ],
            advanced_packages: ["WLCSP", "FCCSP", "FCBGA", "FOWLP", "CHIPLET", "2.5D", "3D"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            package_points: 3.0,
            technology_node: vec![
                NodePoints {
                    max_nm: 14.0,
                    points: 5.0,
                },
                NodePoints {
                    max_nm: 28.0,
                    points: 3.0,
                },
            ],
        }
    }
}

impl LifecycleSettings {
    /// Points for a feature size, from the smallest matching bound
    pub fn node_points(&self, nm: f64) -> f64 {
        self.technology_node
            .iter()
            .filter(|n| nm <= n.max_nm)
            .min_by(|a, b| a.max_nm.total_cmp(&b.max_nm))
            .map(|n| n.points)
            .unwrap_or(0.0)
    }

    pub fn is_advanced_package(&self, package: &str) -> bool {
        let upper = package.to_uppercase();
        self.advanced_packages
            .iter()
            .any(|p| upper.contains(&p.to_uppercase()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePenalty {
    pub advanced: f64,
    pub mainstream: f64,
    pub mature: f64,
    pub legacy: f64,
}

impl Default for NodePenalty {
    fn default() -> Self {
        Self {
            advanced: 5.0,
            mainstream: 3.0,
            mature: 1.0,
            legacy: 0.0,
        }
    }
}

impl NodePenalty {
    pub fn points(&self, tier: NodeTier) -> f64 {
        match tier {
            NodeTier::Advanced => self.advanced,
            NodeTier::Mainstream => self.mainstream,
            NodeTier::Mature => self.mature,
            NodeTier::Legacy => self.legacy,
        }
    }
}

/// Tier-2 material sub-score bands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tier2Settings {
    /// Points by largest single-country material share
    pub concentration: Vec<Band>,
    /// Points by number of critical or non-substitutable materials
    pub critical_count: Vec<Band>,
    /// Points by number of materials overlapping the frontend countries
    pub geo_overlap: Vec<Band>,
    /// Minimum share a frontend country must hold for an overlap
    pub overlap_min_share: f64,
    pub node_penalty: NodePenalty,
    /// Raw sub-score cap
    pub raw_max: f64,
    /// Contribution of a capped raw score to the composite
    pub contribution_max: f64,
    /// Materials at or above this concentration are bottlenecks
    pub bottleneck_concentration: f64,
}

impl Default for Tier2Settings {
    fn default() -> Self {
        let band = |at_least: f64, points: f64| Band { at_least, points };
        Self {
            concentration: vec![band(0.8, 10.0), band(0.6, 7.0), band(0.4, 4.0), band(0.2, 2.0)],
            critical_count: vec![band(3.0, 5.0), band(2.0, 3.0), band(1.0, 1.0)],
            geo_overlap: vec![band(3.0, 5.0), band(2.0, 3.0), band(1.0, 1.0)],
            overlap_min_share: 0.2,
            node_penalty: NodePenalty::default(),
            raw_max: 25.0,
            contribution_max: 15.0,
            bottleneck_concentration: 0.5,
        }
    }
}

impl Tier2Settings {
    /// Rescale a raw sub-score to its composite contribution
    pub fn contribution(&self, raw: f64) -> f64 {
        if self.raw_max <= 0.0 {
            return 0.0;
        }
        raw.clamp(0.0, self.raw_max) * self.contribution_max / self.raw_max
    }
}

/// Tier applicability of a material mapping row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierMatch {
    Any,
    Advanced,
    Mainstream,
    Mature,
    Legacy,
}

impl TierMatch {
    pub fn matches(self, tier: NodeTier) -> bool {
        matches!(
            (self, tier),
            (TierMatch::Any, _)
                | (TierMatch::Advanced, NodeTier::Advanced)
                | (TierMatch::Mainstream, NodeTier::Mainstream)
                | (TierMatch::Mature, NodeTier::Mature)
                | (TierMatch::Legacy, NodeTier::Legacy)
        )
    }
}

/// Materials required by a category at a node tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialMapping {
    pub category: Category,
    pub tier: TierMatch,
    pub materials: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    /// Factors contributing at least this many points get a suggestion
    pub materiality: f64,
    /// Hours per week of requalification
    pub hours_per_qualification_week: f64,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            materiality: 3.0,
            hours_per_qualification_week: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    /// Fraction of a dependency's risk inherited per hop
    pub decay: f64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self { decay: 0.85 }
    }
}

/// Everything the scoring engines need
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub thresholds: LevelThresholds,
    pub weights: FactorWeights,
    pub geographic: GeographicSettings,
    pub single_source: SingleSourceSettings,
    pub lead_time: LeadTimeSettings,
    pub buffer: BufferSettings,
    pub proprietary: ProprietarySettings,
    pub certification: CertificationSettings,
    pub lifecycle: LifecycleSettings,
    pub tier2: Tier2Settings,
    pub node_tiers: NodeTierBounds,
    pub suggestions: SuggestionSettings,
    pub chain: ChainSettings,
    pub switching: SwitchingSettings,
    /// Boards per week when neither request nor client gives one
    pub default_run_rate: f64,
    pub countries: CountryRiskTable,
    pub materials: Vec<CriticalMaterial>,
    pub material_table: Vec<MaterialMapping>,
    /// Materials assumed when a category has no mapping
    pub fallback_materials: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            thresholds: LevelThresholds::default(),
            weights: FactorWeights::default(),
            geographic: GeographicSettings::default(),
            single_source: SingleSourceSettings::default(),
            lead_time: LeadTimeSettings::default(),
            buffer: BufferSettings::default(),
            proprietary: ProprietarySettings::default(),
            certification: CertificationSettings::default(),
            lifecycle: LifecycleSettings::default(),
            tier2: Tier2Settings::default(),
            node_tiers: NodeTierBounds::default(),
            suggestions: SuggestionSettings::default(),
            chain: ChainSettings::default(),
            switching: SwitchingSettings::default(),
            default_run_rate: 5000.0,
            countries: CountryRiskTable::default(),
            materials: default_materials(),
            material_table: default_material_table(),
            fallback_materials: vec!["silicon_wafers".to_string(), "lead_frames".to_string()],
        }
    }
}

impl ScoringConfig {
    /// Parse a (possibly partial) YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig =
            serde_yml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engines cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let decay = self.chain.decay;
        if !(decay > 0.0 && decay < 1.0) {
            return Err(ConfigError::InvalidDecay(decay));
        }
        if self.thresholds.medium >= self.thresholds.high {
            return Err(ConfigError::ThresholdOrder {
                medium: self.thresholds.medium,
                high: self.thresholds.high,
            });
        }
        if !(self.buffer.critical_coverage > 0.0
            && self.buffer.critical_coverage < self.buffer.safe_coverage)
        {
            return Err(ConfigError::BufferTierOrder {
                critical: self.buffer.critical_coverage,
                safe: self.buffer.safe_coverage,
            });
        }

        let w = &self.weights;
        let non_negative = [
            ("weights.geographic", w.geographic),
            ("weights.single_source", w.single_source),
            ("weights.lead_time", w.lead_time),
            ("weights.buffer_stock", w.buffer_stock),
            ("weights.dependency", w.dependency),
            ("weights.proprietary", w.proprietary),
            ("weights.certification", w.certification),
            ("default_run_rate", self.default_run_rate),
            ("tier2.raw_max", self.tier2.raw_max),
            ("tier2.contribution_max", self.tier2.contribution_max),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let shares = self.geographic.frontend_share + self.geographic.backend_share;
        if (shares - 1.0).abs() > 1e-6 {
            return Err(ConfigError::StageShares(shares));
        }

        Ok(())
    }

    pub fn material(&self, id: &str) -> Option<&CriticalMaterial> {
        self.materials.iter().find(|m| m.id == id)
    }
}

fn default_materials() -> Vec<CriticalMaterial> {
    use Criticality as C;
    use Substitutability as S;

    vec![
        CriticalMaterial::from_shares(
            "neon_gas",
            "Neon gas (lithography)",
            C::Critical,
            S::Low,
            0.70,
            "Lithography (EUV/DUV)",
            &[("ukraine", 0.40), ("russia", 0.30), ("korea", 0.15), ("japan", 0.10), ("usa", 0.05)],
        ),
        CriticalMaterial::from_shares(
            "silicon_wafers",
            "Silicon wafers",
            C::Critical,
            S::Low,
            0.55,
            "Wafer fabrication",
            &[("japan", 0.55), ("korea", 0.15), ("germany", 0.12), ("taiwan", 0.10), ("usa", 0.08)],
        ),
        CriticalMaterial::from_shares(
            "photoresists",
            "Photoresists",
            C::Critical,
            S::VeryLow,
            0.90,
            "Photolithography patterning",
            &[("japan", 0.90), ("usa", 0.05), ("germany", 0.05)],
        ),
        CriticalMaterial::from_shares(
            "rare_earth_elements",
            "Rare earth elements",
            C::High,
            S::Low,
            0.70,
            "Magnets, phosphors, polishing",
            &[("china", 0.70), ("myanmar", 0.10), ("australia", 0.08), ("usa", 0.05), ("others", 0.07)],
        ),
        CriticalMaterial::from_shares(
            "specialty_gases",
            "Specialty gases (F2, SiH4, PH3, AsH3)",
            C::High,
            S::Medium,
            0.30,
            "Etching, doping, deposition",
            &[("usa", 0.30), ("japan", 0.25), ("korea", 0.20), ("germany", 0.15), ("china", 0.10)],
        ),
        CriticalMaterial::from_shares(
            "sic_substrates",
            "SiC substrates",
            C::High,
            S::Low,
            0.60,
            "Power semiconductor fabrication",
            &[("usa", 0.60), ("china", 0.20), ("japan", 0.10), ("europe", 0.10)],
        ),
        CriticalMaterial::from_shares(
            "gan_substrates",
            "GaN substrates and epitaxy",
            C::High,
            S::Low,
            0.40,
            "RF/power GaN device fabrication",
            &[("japan", 0.40), ("usa", 0.30), ("china", 0.15), ("europe", 0.15)],
        ),
        CriticalMaterial::from_shares(
            "bonding_wire_gold",
            "Gold bonding wire",
            C::Medium,
            S::Medium,
            0.35,
            "Wire bonding (backend)",
            &[("japan", 0.35), ("korea", 0.25), ("china", 0.20), ("singapore", 0.10), ("europe", 0.10)],
        ),
        CriticalMaterial::from_shares(
            "bonding_wire_palladium",
            "Palladium-coated copper wire",
            C::Medium,
            S::Low,
            0.65,
            "Wire bonding (backend)",
            &[("south africa", 0.40), ("russia", 0.25), ("canada", 0.10), ("usa", 0.10), ("others", 0.15)],
        ),
        CriticalMaterial::from_shares(
            "hf_chemicals",
            "High-purity HF and H2O2",
            C::High,
            S::Medium,
            0.35,
            "Wafer cleaning, etching",
            &[("japan", 0.35), ("usa", 0.25), ("korea", 0.20), ("china", 0.10), ("europe", 0.10)],
        ),
        CriticalMaterial::from_shares(
            "sapphire_substrates",
            "Sapphire substrates",
            C::Medium,
            S::Medium,
            0.50,
            "LED/sensor substrate",
            &[("china", 0.50), ("russia", 0.15), ("japan", 0.15), ("usa", 0.10), ("europe", 0.10)],
        ),
        CriticalMaterial::from_shares(
            "cmp_slurry",
            "CMP slurry and pads",
            C::High,
            S::Low,
            0.45,
            "Chemical mechanical polishing",
            &[("usa", 0.45), ("japan", 0.30), ("korea", 0.15), ("europe", 0.10)],
        ),
        CriticalMaterial::from_shares(
            "lead_frames",
            "Lead frames",
            C::Medium,
            S::Medium,
            0.30,
            "Package assembly",
            &[("japan", 0.30), ("china", 0.25), ("malaysia", 0.20), ("korea", 0.15), ("europe", 0.10)],
        ),
    ]
}

fn default_material_table() -> Vec<MaterialMapping> {
    use TierMatch::*;

    let row = |category: Category, tier: TierMatch, materials: &[&str]| MaterialMapping {
        category,
        tier,
        materials: materials.iter().map(|m| m.to_string()).collect(),
    };

    vec![
        row(Category::Mcu, Advanced, &["silicon_wafers", "photoresists", "neon_gas", "specialty_gases", "hf_chemicals", "cmp_slurry", "bonding_wire_gold", "lead_frames"]),
        row(Category::Mcu, Mainstream, &["silicon_wafers", "photoresists", "neon_gas", "specialty_gases", "hf_chemicals", "bonding_wire_gold", "lead_frames"]),
        row(Category::Mcu, Mature, &["silicon_wafers", "neon_gas", "specialty_gases", "hf_chemicals", "lead_frames"]),
        row(Category::Mcu, Legacy, &["silicon_wafers", "neon_gas", "hf_chemicals", "lead_frames"]),
        row(Category::Mpu, Advanced, &["silicon_wafers", "photoresists", "neon_gas", "specialty_gases", "hf_chemicals", "cmp_slurry", "rare_earth_elements", "bonding_wire_gold"]),
        row(Category::Mpu, Mainstream, &["silicon_wafers", "photoresists", "neon_gas", "specialty_gases", "hf_chemicals", "cmp_slurry", "bonding_wire_gold"]),
        row(Category::Mpu, Mature, &["silicon_wafers", "neon_gas", "specialty_gases", "hf_chemicals", "bonding_wire_gold"]),
        row(Category::Mpu, Legacy, &["silicon_wafers", "neon_gas", "hf_chemicals"]),
        row(Category::Memory, Advanced, &["silicon_wafers", "photoresists", "neon_gas", "specialty_gases", "hf_chemicals", "cmp_slurry", "bonding_wire_gold"]),
        row(Category::Memory, Mainstream, &["silicon_wafers", "photoresists", "neon_gas", "specialty_gases", "hf_chemicals", "cmp_slurry"]),
        row(Category::Memory, Mature, &["silicon_wafers", "neon_gas", "specialty_gases", "hf_chemicals"]),
        row(Category::Memory, Legacy, &["silicon_wafers", "neon_gas", "lead_frames"]),
        row(Category::Sensor, Advanced, &["silicon_wafers", "photoresists", "neon_gas", "specialty_gases", "sapphire_substrates", "bonding_wire_gold"]),
        row(Category::Sensor, Mainstream, &["silicon_wafers", "neon_gas", "specialty_gases", "sapphire_substrates", "lead_frames"]),
        row(Category::Sensor, Mature, &["silicon_wafers", "neon_gas", "specialty_gases", "lead_frames"]),
        row(Category::Sensor, Legacy, &["silicon_wafers", "neon_gas", "lead_frames"]),
        row(Category::Power, Advanced, &["sic_substrates", "gan_substrates", "silicon_wafers", "specialty_gases", "bonding_wire_gold", "bonding_wire_palladium", "lead_frames"]),
        row(Category::Power, Mainstream, &["sic_substrates", "silicon_wafers", "specialty_gases", "bonding_wire_gold", "lead_frames"]),
        row(Category::Power, Mature, &["silicon_wafers", "specialty_gases", "lead_frames"]),
        row(Category::Power, Legacy, &["silicon_wafers", "lead_frames"]),
        row(Category::Analog, Advanced, &["silicon_wafers", "photoresists", "neon_gas", "specialty_gases", "hf_chemicals", "lead_frames"]),
        row(Category::Analog, Mainstream, &["silicon_wafers", "neon_gas", "specialty_gases", "hf_chemicals", "lead_frames"]),
        row(Category::Analog, Mature, &["silicon_wafers", "neon_gas", "specialty_gases", "lead_frames"]),
        row(Category::Analog, Legacy, &["silicon_wafers", "neon_gas", "lead_frames"]),
        row(Category::Rf, Advanced, &["silicon_wafers", "photoresists", "neon_gas", "gan_substrates", "specialty_gases", "bonding_wire_gold"]),
        row(Category::Rf, Mainstream, &["silicon_wafers", "neon_gas", "gan_substrates", "specialty_gases", "bonding_wire_gold"]),
        row(Category::Rf, Mature, &["silicon_wafers", "neon_gas", "specialty_gases", "lead_frames"]),
        row(Category::Rf, Legacy, &["silicon_wafers", "neon_gas", "lead_frames"]),
        row(Category::Passive, Any, &["rare_earth_elements", "lead_frames"]),
        row(Category::Connector, Any, &[]),
    ]
}

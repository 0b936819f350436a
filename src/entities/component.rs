//! Component record - one sourced electronic part, keyed by part number

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::store::normalize_key;

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Mcu,
    Mpu,
    Sensor,
    Power,
    Memory,
    Rf,
    Connector,
    Analog,
    Passive,
    /// A category the material table has no entry for
    Other(String),
}

impl Category {
    /// Whether this category was recognized when parsed
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Mcu => write!(f, "MCU"),
            Category::Mpu => write!(f, "MPU"),
            Category::Sensor => write!(f, "Sensor"),
            Category::Power => write!(f, "Power"),
            Category::Memory => write!(f, "Memory"),
            Category::Rf => write!(f, "RF"),
            Category::Connector => write!(f, "Connector"),
            Category::Analog => write!(f, "Analog"),
            Category::Passive => write!(f, "Passive"),
            Category::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "mcu" => Category::Mcu,
            "mpu" => Category::Mpu,
            "sensor" => Category::Sensor,
            "power" | "pmic" => Category::Power,
            "memory" | "ddr" | "flash" => Category::Memory,
            "rf" | "transceiver" | "transceiver wireless" | "wireless" => Category::Rf,
            "connector" => Category::Connector,
            "analog" | "analogic" => Category::Analog,
            "passive" | "passive component" => Category::Passive,
            _ => Category::Other(s.trim().to_string()),
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.to_string()
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from(s.to_string()))
    }
}

/// Technology-node bucket used by the material table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeTier {
    Advanced,
    Mainstream,
    Mature,
    Legacy,
}

impl std::fmt::Display for NodeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeTier::Advanced => write!(f, "advanced"),
            NodeTier::Mainstream => write!(f, "mainstream"),
            NodeTier::Mature => write!(f, "mature"),
            NodeTier::Legacy => write!(f, "legacy"),
        }
    }
}

impl std::str::FromStr for NodeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advanced" => Ok(NodeTier::Advanced),
            "mainstream" => Ok(NodeTier::Mainstream),
            "mature" => Ok(NodeTier::Mature),
            "legacy" => Ok(NodeTier::Legacy),
            _ => Err(format!(
                "Invalid node tier: {}. Use advanced, mainstream, mature, or legacy",
                s
            )),
        }
    }
}

/// Upper bounds (in nm, inclusive) of each node tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeTierBounds {
    pub advanced_max_nm: f64,
    pub mainstream_max_nm: f64,
    pub mature_max_nm: f64,
}

impl Default for NodeTierBounds {
    fn default() -> Self {
        Self {
            advanced_max_nm: 7.0,
            mainstream_max_nm: 28.0,
            mature_max_nm: 90.0,
        }
    }
}

/// Technology node, either a named tier or an explicit feature size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr", into = "NodeRepr")]
pub enum TechnologyNode {
    Tier(NodeTier),
    Nanometers(f64),
}

impl TechnologyNode {
    /// Bucket this node into a tier
    pub fn tier(&self, bounds: &NodeTierBounds) -> NodeTier {
        match *self {
            TechnologyNode::Tier(t) => t,
            TechnologyNode::Nanometers(nm) if nm <= bounds.advanced_max_nm => NodeTier::Advanced,
            TechnologyNode::Nanometers(nm) if nm <= bounds.mainstream_max_nm => NodeTier::Mainstream,
            TechnologyNode::Nanometers(nm) if nm <= bounds.mature_max_nm => NodeTier::Mature,
            TechnologyNode::Nanometers(_) => NodeTier::Legacy,
        }
    }

    /// Feature size when known explicitly
    pub fn nanometers(&self) -> Option<f64> {
        match *self {
            TechnologyNode::Nanometers(nm) => Some(nm),
            TechnologyNode::Tier(_) => None,
        }
    }
}

impl std::fmt::Display for TechnologyNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TechnologyNode::Tier(t) => write!(f, "{}", t),
            TechnologyNode::Nanometers(nm) => write!(f, "{}nm", nm),
        }
    }
}

impl std::str::FromStr for TechnologyNode {
    type Err = String;

    /// Accepts a tier name, "28nm", "28", or "0.18um"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Ok(tier) = lower.parse::<NodeTier>() {
            return Ok(TechnologyNode::Tier(tier));
        }

        let (digits, scale) = if let Some(um) = lower.strip_suffix("um") {
            (um, 1000.0)
        } else if let Some(nm) = lower.strip_suffix("nm") {
            (nm, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let value: f64 = digits
            .trim()
            .parse()
            .map_err(|_| format!("Invalid technology node: {}", s))?;
        if value <= 0.0 {
            return Err(format!("Technology node must be positive: {}", s));
        }
        Ok(TechnologyNode::Nanometers(value * scale))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum NodeRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<NodeRepr> for TechnologyNode {
    type Error = String;

    fn try_from(repr: NodeRepr) -> Result<Self, Self::Error> {
        match repr {
            NodeRepr::Number(nm) if nm > 0.0 => Ok(TechnologyNode::Nanometers(nm)),
            NodeRepr::Number(nm) => Err(format!("Technology node must be positive: {}", nm)),
            NodeRepr::Text(s) => s.parse(),
        }
    }
}

impl From<TechnologyNode> for NodeRepr {
    fn from(node: TechnologyNode) -> Self {
        match node {
            TechnologyNode::Nanometers(nm) => NodeRepr::Number(nm),
            TechnologyNode::Tier(t) => NodeRepr::Text(t.to_string()),
        }
    }
}

/// Manufacturing stage performed at a plant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FabStage {
    /// Wafer fabrication
    Frontend,
    /// Assembly and test
    Backend,
    /// Both stages on one site
    #[default]
    Both,
}

impl FabStage {
    pub fn does_frontend(self) -> bool {
        matches!(self, FabStage::Frontend | FabStage::Both)
    }

    pub fn does_backend(self) -> bool {
        matches!(self, FabStage::Backend | FabStage::Both)
    }
}

/// A production site for the part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlant {
    pub country: String,

    #[serde(default)]
    pub stage: FabStage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ProductionPlant {
    pub fn new(country: impl Into<String>, stage: FabStage) -> Self {
        Self {
            country: country.into(),
            stage,
            name: None,
        }
    }
}

/// Buffer stock, in weeks of coverage or in units
///
/// When both are given, weeks win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferStock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,
}

impl BufferStock {
    pub fn weeks(weeks: f64) -> Self {
        Self {
            weeks: Some(weeks),
            units: None,
        }
    }

    pub fn units(units: f64) -> Self {
        Self {
            weeks: None,
            units: Some(units),
        }
    }

    /// Whether either quantity is usable
    pub fn is_valid(&self) -> bool {
        let usable = |v: Option<f64>| v.is_some_and(|x| x.is_finite() && x >= 0.0);
        usable(self.weeks) || usable(self.units)
    }

    /// Weeks of coverage given a weekly consumption in units
    pub fn coverage_weeks(&self, weekly_consumption: f64) -> Option<f64> {
        if let Some(w) = self.weeks.filter(|w| *w >= 0.0) {
            return Some(w);
        }
        match self.units.filter(|u| *u >= 0.0) {
            Some(units) if weekly_consumption > 0.0 => Some(units / weekly_consumption),
            _ => None,
        }
    }
}

/// Lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum EolStatus {
    #[default]
    Active,
    Nrnd,
    LastBuy,
    Eol,
    Obsolete,
}

impl std::fmt::Display for EolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EolStatus::Active => write!(f, "Active"),
            EolStatus::Nrnd => write!(f, "NRND"),
            EolStatus::LastBuy => write!(f, "Last_Buy"),
            EolStatus::Eol => write!(f, "EOL"),
            EolStatus::Obsolete => write!(f, "Obsolete"),
        }
    }
}

impl std::str::FromStr for EolStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "ACTIVE" => Ok(EolStatus::Active),
            "NRND" | "NOT_RECOMMENDED" => Ok(EolStatus::Nrnd),
            "LAST_BUY" | "LTB" => Ok(EolStatus::LastBuy),
            "EOL" => Ok(EolStatus::Eol),
            "OBSOLETE" => Ok(EolStatus::Obsolete),
            _ => Err(format!(
                "Invalid EOL status: {}. Use Active, NRND, Last_Buy, EOL, or Obsolete",
                s
            )),
        }
    }
}

impl TryFrom<String> for EolStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<EolStatus> for String {
    fn from(s: EolStatus) -> Self {
        s.to_string()
    }
}

/// Supplier financial rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FinancialRating {
    A,
    B,
    C,
    D,
}

impl std::fmt::Display for FinancialRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinancialRating::A => write!(f, "A"),
            FinancialRating::B => write!(f, "B"),
            FinancialRating::C => write!(f, "C"),
            FinancialRating::D => write!(f, "D"),
        }
    }
}

impl std::str::FromStr for FinancialRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(FinancialRating::A),
            "B" => Ok(FinancialRating::B),
            "C" => Ok(FinancialRating::C),
            "D" => Ok(FinancialRating::D),
            _ => Err(format!("Invalid financial rating: {}. Use A, B, C, or D", s)),
        }
    }
}

impl TryFrom<String> for FinancialRating {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FinancialRating> for String {
    fn from(r: FinancialRating) -> Self {
        r.to_string()
    }
}

/// Market allocation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum AllocationStatus {
    #[default]
    Normal,
    Constrained,
    Allocated,
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationStatus::Normal => write!(f, "Normal"),
            AllocationStatus::Constrained => write!(f, "Constrained"),
            AllocationStatus::Allocated => write!(f, "Allocated"),
        }
    }
}

impl std::str::FromStr for AllocationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(AllocationStatus::Normal),
            "constrained" => Ok(AllocationStatus::Constrained),
            "allocated" | "allocation" => Ok(AllocationStatus::Allocated),
            _ => Err(format!(
                "Invalid allocation status: {}. Use Normal, Constrained, or Allocated",
                s
            )),
        }
    }
}

impl TryFrom<String> for AllocationStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AllocationStatus> for String {
    fn from(s: AllocationStatus) -> Self {
        s.to_string()
    }
}

/// A sourced component, as held by the record store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Part number (unique key, fixed at creation)
    part_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology_node: Option<TechnologyNode>,

    /// Production sites, tagged by fab stage
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plants: Vec<ProductionPlant>,

    /// Standard supplier lead time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_weeks: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_stock: Option<BufferStock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proprietary: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity: Option<bool>,

    /// Functions without any other BOM part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standalone: Option<bool>,

    /// Time to requalify a replacement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requalification_weeks: Option<f64>,

    /// Certifications the part carries (free text, e.g. "AEC-Q100")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eol_status: Option<EolStatus>,

    /// Alternative parts available on the market
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_sources: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_rating: Option<FinancialRating>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<AllocationStatus>,

    /// Most recent price increase, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price_increase_pct: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Market price per unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    /// Firmware running on this part, in KB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sw_code_size_kb: Option<f64>,

    /// OS or bare metal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
}

impl ComponentRecord {
    /// Create an empty record for the given part number
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into().trim().to_string(),
            supplier: None,
            description: None,
            category: None,
            technology_node: None,
            plants: Vec::new(),
            lead_time_weeks: None,
            buffer_stock: None,
            proprietary: None,
            commodity: None,
            standalone: None,
            requalification_weeks: None,
            certification: None,
            eol_status: None,
            alternative_sources: None,
            financial_rating: None,
            allocation: None,
            last_price_increase_pct: None,
            package: None,
            unit_price: None,
            sw_code_size_kb: None,
            os_type: None,
        }
    }

    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    /// Normalized store key
    pub fn key(&self) -> String {
        normalize_key(&self.part_number)
    }

    /// Numeric fields holding a negative value
    pub fn negative_fields(&self) -> Vec<(&'static str, f64)> {
        let checks = [
            ("lead_time_weeks", self.lead_time_weeks),
            ("buffer_stock.weeks", self.buffer_stock.and_then(|b| b.weeks)),
            ("buffer_stock.units", self.buffer_stock.and_then(|b| b.units)),
            ("requalification_weeks", self.requalification_weeks),
            ("last_price_increase_pct", self.last_price_increase_pct),
            ("unit_price", self.unit_price),
            ("sw_code_size_kb", self.sw_code_size_kb),
        ];
        checks
            .iter()
            .filter_map(|(name, v)| v.filter(|v| *v < 0.0).map(|v| (*name, v)))
            .collect()
    }

    /// Distinct countries running wafer fabrication
    pub fn frontend_countries(&self) -> BTreeSet<String> {
        self.plants
            .iter()
            .filter(|p| p.stage.does_frontend())
            .map(|p| p.country.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Distinct countries running assembly/test
    pub fn backend_countries(&self) -> BTreeSet<String> {
        self.plants
            .iter()
            .filter(|p| p.stage.does_backend())
            .map(|p| p.country.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Number of independent production paths
    ///
    /// The narrower of the two stages bounds how many sites can ship the part.
    pub fn production_paths(&self) -> usize {
        let fe = self.plants.iter().filter(|p| p.stage.does_frontend()).count();
        let be = self.plants.iter().filter(|p| p.stage.does_backend()).count();
        match (fe, be) {
            (0, n) | (n, 0) => n,
            (f, b) => f.min(b),
        }
    }
}

//! Upstream critical materials and component-to-material links

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How critical a material is to production
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Criticality {
    #[serde(alias = "critical")]
    Critical,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

/// How readily a material can be replaced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Substitutability {
    #[serde(alias = "very_low")]
    VeryLow,
    #[serde(alias = "low")]
    Low,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

impl std::fmt::Display for Substitutability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Substitutability::VeryLow => write!(f, "VERY_LOW"),
            Substitutability::Low => write!(f, "LOW"),
            Substitutability::Medium => write!(f, "MEDIUM"),
            Substitutability::High => write!(f, "HIGH"),
        }
    }
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criticality::Critical => write!(f, "CRITICAL"),
            Criticality::High => write!(f, "HIGH"),
            Criticality::Medium => write!(f, "MEDIUM"),
            Criticality::Low => write!(f, "LOW"),
        }
    }
}

/// A raw or process material sourced upstream of the component supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalMaterial {
    /// Catalog identifier, e.g. `neon_gas`
    pub id: String,

    pub name: String,

    /// Country holding the largest share of global supply
    pub dominant_country: String,

    /// Supply concentration risk, 0-1
    pub concentration: f64,

    pub criticality: Criticality,

    #[serde(default)]
    pub substitutability: Substitutability,

    /// Supply share by country, 0-1
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub country_shares: BTreeMap<String, f64>,

    /// Process step the material feeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
}

impl CriticalMaterial {
    /// Build a catalog entry from its supply shares
    ///
    /// The dominant country is the one with the largest share.
    pub fn from_shares(
        id: &str,
        name: &str,
        criticality: Criticality,
        substitutability: Substitutability,
        concentration: f64,
        process: &str,
        shares: &[(&str, f64)],
    ) -> Self {
        let country_shares: BTreeMap<String, f64> = shares
            .iter()
            .map(|(c, s)| (c.to_string(), *s))
            .collect();
        let dominant_country = shares
            .iter()
            .fold(("unknown", 0.0_f64), |best, (c, s)| if *s > best.1 { (*c, *s) } else { best })
            .0;

        Self {
            id: id.to_string(),
            name: name.to_string(),
            dominant_country: dominant_country.to_string(),
            concentration,
            criticality,
            substitutability,
            country_shares,
            process: Some(process.to_string()),
        }
    }

    /// Largest single-country share of supply
    ///
    /// Falls back to the concentration figure when no shares are listed.
    pub fn max_share(&self) -> f64 {
        self.country_shares
            .values()
            .copied()
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))
            .unwrap_or(self.concentration)
    }

    /// Critical, or practically impossible to substitute
    pub fn is_critical(&self) -> bool {
        self.criticality == Criticality::Critical
            || self.substitutability == Substitutability::VeryLow
    }

    /// Supply share held by a country (0 when not listed)
    pub fn share_of(&self, country: &str) -> f64 {
        let wanted = country.trim().to_lowercase();
        self.country_shares
            .iter()
            .find(|(c, _)| c.to_lowercase() == wanted)
            .map(|(_, s)| *s)
            .unwrap_or(0.0)
    }
}

/// Explicit association between a part number and a material
///
/// Optional fields refine the catalog values for this component only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentMaterialLink {
    pub part_number: String,

    pub material_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_country: Option<String>,
}

impl ComponentMaterialLink {
    pub fn new(part_number: impl Into<String>, material_id: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            material_id: material_id.into(),
            concentration: None,
            dominant_country: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_shares_picks_dominant_country() {
        let m = CriticalMaterial::from_shares(
            "photoresists",
            "Photoresists",
            Criticality::High,
            Substitutability::VeryLow,
            0.85,
            "lithography",
            &[("japan", 0.90), ("usa", 0.05), ("korea", 0.05)],
        );
        assert_eq!(m.dominant_country, "japan");
        assert!((m.max_share() - 0.90).abs() < 1e-9);
        assert!(m.is_critical());
        assert!((m.share_of("Japan") - 0.90).abs() < 1e-9);
        assert_eq!(m.share_of("italy"), 0.0);
    }

    #[test]
    fn test_material_yaml_parsing() {
        let yaml = r#"
id: indium_phosphide
name: Indium phosphide wafers
dominant_country: china
concentration: 0.6
criticality: high
"#;
        let m: CriticalMaterial = serde_yml::from_str(yaml).unwrap();
        assert_eq!(m.criticality, Criticality::High);
        assert_eq!(m.substitutability, Substitutability::Medium);
        assert!(m.country_shares.is_empty());
        assert!((m.max_share() - 0.6).abs() < 1e-9);
        assert!(!m.is_critical());
    }
}

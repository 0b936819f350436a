//! Tier-2 material scoring
//!
//! Resolves the upstream materials a component depends on (explicit links
//! first, then the category x node-tier table) and scores their concentration
//! into a 0-25 raw sub-score.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::assessment::DataIssue;
use crate::analysis::config::{band_points, ScoringConfig, TierMatch};
use crate::entities::{
    Category, ComponentMaterialLink, ComponentRecord, CriticalMaterial, Criticality, NodeTier,
    Substitutability, TechnologyNode,
};

/// Materials known to the scorer, keyed by id
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    materials: BTreeMap<String, CriticalMaterial>,
}

impl MaterialCatalog {
    pub fn new(materials: impl IntoIterator<Item = CriticalMaterial>) -> Self {
        Self {
            materials: materials.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }

    /// Add or replace materials by id
    pub fn extend(&mut self, materials: impl IntoIterator<Item = CriticalMaterial>) {
        for m in materials {
            self.materials.insert(m.id.clone(), m);
        }
    }

    pub fn get(&self, id: &str) -> Option<&CriticalMaterial> {
        self.materials.get(id)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// A material as it applies to one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedMaterial {
    pub id: String,
    pub name: String,
    /// Effective concentration after link overrides
    pub concentration: f64,
    pub dominant_country: String,
    pub criticality: Criticality,
    pub substitutability: Substitutability,
    /// Largest single-country share
    pub max_share: f64,
    pub bottleneck: bool,
    /// Shares supply geography with the component's frontend
    pub frontend_overlap: bool,
    /// Came from an explicit component link
    pub explicit: bool,
}

/// Tier-2 sub-score for one component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tier2Result {
    /// 0-25
    pub raw_score: f64,
    /// Rescaled composite contribution, 0-15
    pub contribution: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_tier: Option<NodeTier>,
    pub max_share: f64,
    pub critical_count: usize,
    pub overlap_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<LinkedMaterial>,
    #[serde(skip)]
    pub issues: Vec<DataIssue>,
}

impl Tier2Result {
    /// Bottlenecks, most concentrated first
    pub fn bottlenecks(&self) -> Vec<&LinkedMaterial> {
        let mut out: Vec<&LinkedMaterial> = self.materials.iter().filter(|m| m.bottleneck).collect();
        out.sort_by(|a, b| b.concentration.total_cmp(&a.concentration).then(a.id.cmp(&b.id)));
        out
    }

    /// Mitigation text for the worst bottleneck
    pub fn suggestion(&self) -> String {
        match self.bottlenecks().first() {
            Some(m) if m.concentration >= 0.7 => format!(
                "Qualify an alternative source for {} (currently {:.0}% from {})",
                m.name,
                m.concentration * 100.0,
                title_case(&m.dominant_country)
            ),
            Some(m) => format!(
                "Monitor availability of {} ({})",
                m.name,
                title_case(&m.dominant_country)
            ),
            None => "Diversify tier-2 material sources away from the frontend countries".to_string(),
        }
    }
}

/// Material used by several components of a BOM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialExposure {
    pub id: String,
    pub name: String,
    pub affected: Vec<String>,
    pub max_share: f64,
    pub dominant_country: String,
    pub criticality: Criticality,
    /// Affected count times max share
    pub impact: f64,
}

/// Supply exposure of a BOM to one country
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryExposure {
    pub country: String,
    pub materials: Vec<String>,
    pub components: Vec<String>,
    /// Sum of shares over every material occurrence
    pub total_exposure: f64,
}

/// BOM-level tier-2 bottleneck analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BomTier2Report {
    pub component_count: usize,
    /// Mean raw sub-score
    pub average_score: f64,
    /// Highest impact first
    pub materials: Vec<MaterialExposure>,
    /// Highest exposure first
    pub countries: Vec<CountryExposure>,
    pub recommendations: Vec<String>,
}

pub(crate) fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scores a component's upstream material exposure
pub struct Tier2MaterialScorer<'a> {
    config: &'a ScoringConfig,
    catalog: MaterialCatalog,
}

impl<'a> Tier2MaterialScorer<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self {
            config,
            catalog: MaterialCatalog::new(config.materials.iter().cloned()),
        }
    }

    /// Add materials beyond the configured catalog
    pub fn with_materials(mut self, materials: impl IntoIterator<Item = CriticalMaterial>) -> Self {
        self.catalog.extend(materials);
        self
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    /// Materials the table maps a category and tier to
    ///
    /// Unknown or unmapped categories fall back to the configured minimum list.
    pub fn resolve(&self, category: Option<&Category>, tier: NodeTier) -> (Vec<String>, Option<DataIssue>) {
        let Some(category) = category else {
            return (
                self.config.fallback_materials.clone(),
                Some(DataIssue::missing("category")),
            );
        };

        let table = &self.config.material_table;
        let exact = table
            .iter()
            .find(|m| &m.category == category && m.tier.matches(tier) && m.tier != TierMatch::Any);
        let any = table
            .iter()
            .find(|m| &m.category == category && m.tier == TierMatch::Any);

        match exact.or(any) {
            Some(mapping) => (mapping.materials.clone(), None),
            None => {
                log::warn!("No material mapping for category '{}', using fallback", category);
                (
                    self.config.fallback_materials.clone(),
                    Some(DataIssue::unknown("category", category.to_string())),
                )
            }
        }
    }

    /// Score a record with its explicit material links
    pub fn score_record(&self, record: &ComponentRecord, links: &[ComponentMaterialLink]) -> Tier2Result {
        let frontend: BTreeSet<String> = record
            .frontend_countries()
            .iter()
            .map(|c| self.config.countries.normalize(c))
            .collect();
        self.score(record.category.as_ref(), record.technology_node, &frontend, links)
    }

    /// Score a category and node against the catalog
    ///
    /// `frontend` holds normalized frontend country keys.
    pub fn score(
        &self,
        category: Option<&Category>,
        node: Option<TechnologyNode>,
        frontend: &BTreeSet<String>,
        links: &[ComponentMaterialLink],
    ) -> Tier2Result {
        let settings = &self.config.tier2;
        let mut issues = Vec::new();

        let node_tier = node.map(|n| n.tier(&self.config.node_tiers));
        if node_tier.is_none() {
            issues.push(DataIssue::missing("technology_node"));
        }
        let lookup_tier = node_tier.unwrap_or(NodeTier::Mature);

        let (mut ids, issue) = self.resolve(category, lookup_tier);
        issues.extend(issue);

        let mut overrides: BTreeMap<&str, &ComponentMaterialLink> = BTreeMap::new();
        for link in links {
            if !ids.iter().any(|id| id == &link.material_id) {
                ids.push(link.material_id.clone());
            }
            overrides.insert(link.material_id.as_str(), link);
        }

        let mut materials = Vec::new();
        for id in &ids {
            let Some(material) = self.catalog.get(id) else {
                log::warn!("Unknown material '{}'", id);
                issues.push(DataIssue::unknown("material", id.clone()));
                continue;
            };
            let link = overrides.get(id.as_str());

            let concentration = link
                .and_then(|l| l.concentration)
                .filter(|c| (0.0..=1.0).contains(c))
                .unwrap_or(material.concentration);
            let max_share = link
                .and_then(|l| l.concentration)
                .filter(|c| (0.0..=1.0).contains(c))
                .unwrap_or_else(|| material.max_share());
            let dominant_country = link
                .and_then(|l| l.dominant_country.clone())
                .unwrap_or_else(|| material.dominant_country.clone());

            let dominant_key = self.config.countries.normalize(&dominant_country);
            let frontend_overlap = frontend.contains(&dominant_key)
                || material.country_shares.iter().any(|(c, share)| {
                    *share >= settings.overlap_min_share
                        && frontend.contains(&self.config.countries.normalize(c))
                });

            materials.push(LinkedMaterial {
                id: material.id.clone(),
                name: material.name.clone(),
                concentration,
                dominant_country,
                criticality: material.criticality,
                substitutability: material.substitutability,
                max_share,
                bottleneck: concentration >= settings.bottleneck_concentration
                    || material.criticality == Criticality::Critical,
                frontend_overlap,
                explicit: link.is_some(),
            });
        }

        let max_share = materials.iter().map(|m| m.max_share).fold(0.0, f64::max);
        let critical_count = materials
            .iter()
            .filter(|m| {
                m.criticality == Criticality::Critical
                    || m.substitutability == Substitutability::VeryLow
            })
            .count();
        let overlap_count = materials.iter().filter(|m| m.frontend_overlap).count();

        let mut raw = band_points(&settings.concentration, max_share)
            + band_points(&settings.critical_count, critical_count as f64)
            + band_points(&settings.geo_overlap, overlap_count as f64);
        if let Some(tier) = node_tier {
            raw += settings.node_penalty.points(tier);
        }
        let raw_score = raw.clamp(0.0, settings.raw_max);

        Tier2Result {
            raw_score,
            contribution: settings.contribution(raw_score),
            node_tier,
            max_share,
            critical_count,
            overlap_count,
            materials,
            issues,
        }
    }

    /// Aggregate per-component results into BOM bottlenecks
    pub fn bom_report<'r>(&self, results: impl IntoIterator<Item = (&'r str, &'r Tier2Result)>) -> BomTier2Report {
        let mut component_count = 0usize;
        let mut total_score = 0.0;
        let mut by_material: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut by_country: BTreeMap<String, (BTreeSet<String>, BTreeSet<String>, f64)> = BTreeMap::new();

        for (pn, result) in results {
            component_count += 1;
            total_score += result.raw_score;
            for m in &result.materials {
                by_material.entry(m.id.clone()).or_default().push(pn.to_string());
                if let Some(material) = self.catalog.get(&m.id) {
                    for (country, share) in &material.country_shares {
                        let entry = by_country.entry(country.clone()).or_default();
                        entry.0.insert(m.id.clone());
                        entry.1.insert(pn.to_string());
                        entry.2 += share;
                    }
                }
            }
        }

        let mut materials: Vec<MaterialExposure> = by_material
            .into_iter()
            .filter_map(|(id, affected)| {
                let material = self.catalog.get(&id)?;
                let max_share = material.max_share();
                Some(MaterialExposure {
                    name: material.name.clone(),
                    impact: affected.len() as f64 * max_share,
                    affected,
                    max_share,
                    dominant_country: material.dominant_country.clone(),
                    criticality: material.criticality,
                    id,
                })
            })
            .collect();
        materials.sort_by(|a, b| b.impact.total_cmp(&a.impact).then(a.id.cmp(&b.id)));

        let mut countries: Vec<CountryExposure> = by_country
            .into_iter()
            .map(|(country, (mats, comps, total))| CountryExposure {
                country,
                materials: mats.into_iter().collect(),
                components: comps.into_iter().collect(),
                total_exposure: total,
            })
            .collect();
        countries.sort_by(|a, b| {
            b.total_exposure
                .total_cmp(&a.total_exposure)
                .then(a.country.cmp(&b.country))
        });

        let recommendations = recommendations(&materials, &countries, component_count);
        let average_score = if component_count > 0 {
            total_score / component_count as f64
        } else {
            0.0
        };

        BomTier2Report {
            component_count,
            average_score,
            materials,
            countries,
            recommendations,
        }
    }
}

fn recommendations(
    materials: &[MaterialExposure],
    countries: &[CountryExposure],
    total: usize,
) -> Vec<String> {
    let mut recs = Vec::new();
    if total == 0 {
        return recs;
    }

    for m in materials.iter().take(5) {
        let pct = m.affected.len() as f64 / total as f64 * 100.0;
        if m.max_share >= 0.7 && pct >= 50.0 {
            recs.push(format!(
                "CRITICAL: {} affects {}/{} components ({:.0}%) with {:.0}% concentration in {}. Qualify an alternative supplier urgently.",
                m.name,
                m.affected.len(),
                total,
                pct,
                m.max_share * 100.0,
                title_case(&m.dominant_country)
            ));
        } else if m.max_share >= 0.5 && pct >= 30.0 {
            recs.push(format!(
                "HIGH: {} affects {} components with high concentration ({} {:.0}%). Evaluate dual sourcing.",
                m.name,
                m.affected.len(),
                title_case(&m.dominant_country),
                m.max_share * 100.0
            ));
        } else if m.criticality == Criticality::Critical {
            recs.push(format!(
                "MEDIUM: {} is a critical material that is hard to substitute. Monitor availability and build a strategic buffer.",
                m.name
            ));
        }
    }

    for c in countries.iter().take(3) {
        if c.components.len() as f64 >= total as f64 * 0.5 {
            recs.push(format!(
                "GEOPOLITICAL: {} affects {} materials and {} components. A disruption there would hit the whole BOM.",
                title_case(&c.country),
                c.materials.len(),
                c.components.len()
            ));
        }
    }

    if recs.is_empty() {
        recs.push("No significant tier-2 risk identified for this BOM.".to_string());
    }
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontend(countries: &[&str]) -> BTreeSet<String> {
        countries.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_advanced_mcu_in_taiwan() {
        let config = ScoringConfig::default();
        let scorer = Tier2MaterialScorer::new(&config);
        let result = scorer.score(
            Some(&Category::Mcu),
            Some(TechnologyNode::Nanometers(5.0)),
            &frontend(&["taiwan"]),
            &[],
        );

        // photoresists at 90% -> 10, three critical materials -> 5,
        // silicon_wafers has taiwan only at 10% -> no overlap, advanced -> 5
        assert_eq!(result.node_tier, Some(NodeTier::Advanced));
        assert_eq!(result.critical_count, 3);
        assert_eq!(result.overlap_count, 0);
        assert_eq!(result.raw_score, 20.0);
        assert_eq!(result.contribution, 12.0);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_frontend_overlap_counts() {
        let config = ScoringConfig::default();
        let scorer = Tier2MaterialScorer::new(&config);
        let result = scorer.score(
            Some(&Category::Mcu),
            Some(TechnologyNode::Nanometers(40.0)),
            &frontend(&["japan"]),
            &[],
        );
        // mature MCU: silicon_wafers, neon_gas, specialty_gases, hf_chemicals, lead_frames
        // japan >= 20% in silicon_wafers, specialty_gases, hf_chemicals, lead_frames
        assert_eq!(result.overlap_count, 4);
        // 0.55 -> 4, two critical -> 3, overlap -> 5, mature -> 1
        assert_eq!(result.raw_score, 13.0);
    }

    #[test]
    fn test_unknown_category_uses_fallback() {
        let config = ScoringConfig::default();
        let scorer = Tier2MaterialScorer::new(&config);
        let result = scorer.score(
            Some(&Category::Other("Crystal".to_string())),
            None,
            &BTreeSet::new(),
            &[],
        );
        let ids: Vec<&str> = result.materials.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["silicon_wafers", "lead_frames"]);
        assert!(result.issues.contains(&DataIssue::missing("technology_node")));
        assert!(result
            .issues
            .contains(&DataIssue::unknown("category", "Crystal")));
        assert_eq!(result.node_tier, None);
    }

    #[test]
    fn test_connector_maps_to_no_materials() {
        let config = ScoringConfig::default();
        let scorer = Tier2MaterialScorer::new(&config);
        let result = scorer.score(Some(&Category::Connector), None, &BTreeSet::new(), &[]);
        assert!(result.materials.is_empty());
        assert_eq!(result.raw_score, 0.0);
    }

    #[test]
    fn test_explicit_links_override_and_extend() {
        let config = ScoringConfig::default();
        let scorer = Tier2MaterialScorer::new(&config);
        let mut link = ComponentMaterialLink::new("PN", "lead_frames");
        link.concentration = Some(0.95);
        link.dominant_country = Some("malaysia".to_string());
        let extra = ComponentMaterialLink::new("PN", "sic_substrates");

        let result = scorer.score(
            Some(&Category::Passive),
            None,
            &BTreeSet::new(),
            &[link, extra],
        );
        let lead = result.materials.iter().find(|m| m.id == "lead_frames").unwrap();
        assert!(lead.explicit);
        assert_eq!(lead.concentration, 0.95);
        assert_eq!(lead.dominant_country, "malaysia");
        assert!(lead.bottleneck);
        assert!(result.materials.iter().any(|m| m.id == "sic_substrates"));
        assert_eq!(result.max_share, 0.95);
    }

    #[test]
    fn test_unknown_linked_material_is_reported() {
        let config = ScoringConfig::default();
        let scorer = Tier2MaterialScorer::new(&config);
        let link = ComponentMaterialLink::new("PN", "unobtainium");
        let result = scorer.score(Some(&Category::Connector), None, &BTreeSet::new(), &[link]);
        assert!(result
            .issues
            .contains(&DataIssue::unknown("material", "unobtainium")));
    }

    #[test]
    fn test_custom_catalog_material() {
        let config = ScoringConfig::default();
        let custom = CriticalMaterial::from_shares(
            "helium",
            "Helium",
            Criticality::High,
            Substitutability::Low,
            0.45,
            "Cooling",
            &[("usa", 0.45), ("qatar", 0.35)],
        );
        let scorer = Tier2MaterialScorer::new(&config).with_materials([custom]);
        let link = ComponentMaterialLink::new("PN", "helium");
        let result = scorer.score(Some(&Category::Connector), None, &BTreeSet::new(), &[link]);
        assert_eq!(result.materials.len(), 1);
        assert_eq!(result.max_share, 0.45);
    }

    #[test]
    fn test_bom_report_ranks_bottlenecks() {
        let config = ScoringConfig::default();
        let scorer = Tier2MaterialScorer::new(&config);
        let fe = frontend(&["taiwan"]);
        let a = scorer.score(Some(&Category::Mcu), Some(TechnologyNode::Nanometers(5.0)), &fe, &[]);
        let b = scorer.score(Some(&Category::Mpu), Some(TechnologyNode::Nanometers(16.0)), &fe, &[]);
        let c = scorer.score(Some(&Category::Passive), None, &BTreeSet::new(), &[]);

        let report = scorer.bom_report([("A", &a), ("B", &b), ("C", &c)]);
        assert_eq!(report.component_count, 3);
        // photoresists: 2 x 0.90 is the highest impact
        assert_eq!(report.materials[0].id, "photoresists");
        assert_eq!(report.materials[0].affected, vec!["A", "B"]);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.starts_with("CRITICAL: Photoresists")));
        assert!(report.countries.iter().any(|c| c.country == "japan"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("south africa"), "South Africa");
        assert_eq!(title_case("japan"), "Japan");
    }
}

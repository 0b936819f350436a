//! Country risk lookup for the frontend and backend manufacturing stages

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Manufacturing stage a country weight applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Frontend,
    Backend,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Frontend => write!(f, "frontend"),
            Stage::Backend => write!(f, "backend"),
        }
    }
}

/// Result of a country lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryWeight {
    pub weight: f64,
    /// False when the default weight was used
    pub known: bool,
}

/// Static risk weight per country and stage
///
/// Frontend weights range 0-25, backend weights 0-15.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryRiskTable {
    pub frontend: BTreeMap<String, f64>,
    pub backend: BTreeMap<String, f64>,
    pub unknown_frontend: f64,
    pub unknown_backend: f64,
    /// Alternate spellings mapped to a canonical key
    pub aliases: BTreeMap<String, String>,
}

impl Default for CountryRiskTable {
    fn default() -> Self {
        let frontend = [
            ("taiwan", 25.0),
            ("china", 20.0),
            ("korea", 15.0),
            ("japan", 12.0),
            ("malaysia", 10.0),
            ("singapore", 8.0),
            ("israel", 8.0),
            ("usa", 5.0),
            ("germany", 3.0),
            ("france", 3.0),
            ("italy", 3.0),
            ("ireland", 3.0),
        ];
        let backend = [
            ("malaysia", 15.0),
            ("philippines", 15.0),
            ("china", 12.0),
            ("taiwan", 10.0),
            ("thailand", 10.0),
            ("vietnam", 10.0),
            ("korea", 8.0),
            ("singapore", 5.0),
            ("usa", 3.0),
            ("germany", 2.0),
            ("france", 2.0),
            ("italy", 2.0),
        ];
        let aliases = [
            ("united states", "usa"),
            ("united states of america", "usa"),
            ("us", "usa"),
            ("u.s.", "usa"),
            ("u.s.a.", "usa"),
            ("south korea", "korea"),
            ("republic of korea", "korea"),
            ("kr", "korea"),
            ("prc", "china"),
            ("people's republic of china", "china"),
            ("cn", "china"),
            ("roc", "taiwan"),
            ("tw", "taiwan"),
            ("jp", "japan"),
            ("deutschland", "germany"),
            ("de", "germany"),
            ("italia", "italy"),
            ("it", "italy"),
            ("fr", "france"),
            ("my", "malaysia"),
            ("ph", "philippines"),
            ("th", "thailand"),
            ("vn", "vietnam"),
            ("viet nam", "vietnam"),
            ("sg", "singapore"),
            ("il", "israel"),
            ("ie", "ireland"),
        ];

        Self {
            frontend: frontend.iter().map(|(c, w)| (c.to_string(), *w)).collect(),
            backend: backend.iter().map(|(c, w)| (c.to_string(), *w)).collect(),
            unknown_frontend: 10.0,
            unknown_backend: 8.0,
            aliases: aliases
                .iter()
                .map(|(a, c)| (a.to_string(), c.to_string()))
                .collect(),
        }
    }
}

impl CountryRiskTable {
    /// Canonical lookup key for a country name
    pub fn normalize(&self, country: &str) -> String {
        let key = country.trim().to_lowercase().replace('_', " ");
        match self.aliases.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    /// Risk weight of a country for one stage
    pub fn weight(&self, stage: Stage, country: &str) -> CountryWeight {
        let key = self.normalize(country);
        let (table, fallback) = match stage {
            Stage::Frontend => (&self.frontend, self.unknown_frontend),
            Stage::Backend => (&self.backend, self.unknown_backend),
        };
        match table.get(&key) {
            Some(w) => CountryWeight {
                weight: *w,
                known: true,
            },
            None => CountryWeight {
                weight: fallback,
                known: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_country_weights() {
        let table = CountryRiskTable::default();
        assert_eq!(table.weight(Stage::Frontend, "Taiwan").weight, 25.0);
        assert_eq!(table.weight(Stage::Backend, "Malaysia").weight, 15.0);
        assert!(table.weight(Stage::Frontend, "Italy").known);
    }

    #[test]
    fn test_aliases_resolve() {
        let table = CountryRiskTable::default();
        assert_eq!(table.normalize(" United States "), "usa");
        assert_eq!(table.normalize("South Korea"), "korea");
        assert_eq!(table.weight(Stage::Frontend, "PRC").weight, 20.0);
    }

    #[test]
    fn test_unknown_country_uses_default() {
        let table = CountryRiskTable::default();
        let w = table.weight(Stage::Frontend, "Atlantis");
        assert!(!w.known);
        assert_eq!(w.weight, 10.0);
        let w = table.weight(Stage::Backend, "Atlantis");
        assert_eq!(w.weight, 8.0);
    }
}

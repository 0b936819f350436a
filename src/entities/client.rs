//! Client records and per-client overrides

use serde::{Deserialize, Serialize};

use crate::core::store::normalize_key;
use crate::entities::component::BufferStock;

/// A client whose BOMs are scored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Boards produced per week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_run_rate: Option<f64>,
}

impl ClientRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            default_run_rate: None,
        }
    }

    pub fn key(&self) -> String {
        normalize_key(&self.id)
    }
}

/// Client-specific values that shadow the component's global ones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientOverride {
    pub client_id: String,

    pub part_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_stock: Option<BufferStock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_weeks: Option<f64>,

    /// Units of this part per board
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bom_quantity: Option<f64>,
}

impl ClientOverride {
    pub fn new(client_id: impl Into<String>, part_number: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            part_number: part_number.into(),
            ..Default::default()
        }
    }

    /// Numeric fields holding a negative value
    pub fn negative_fields(&self) -> Vec<(&'static str, f64)> {
        let checks = [
            ("override.lead_time_weeks", self.lead_time_weeks),
            ("override.buffer_stock.weeks", self.buffer_stock.and_then(|b| b.weeks)),
            ("override.buffer_stock.units", self.buffer_stock.and_then(|b| b.units)),
            ("override.bom_quantity", self.bom_quantity),
        ];
        checks
            .iter()
            .filter_map(|(name, v)| v.filter(|v| *v < 0.0).map(|v| (*name, v)))
            .collect()
    }

    /// Normalized (client, part) key
    pub fn key(&self) -> (String, String) {
        (normalize_key(&self.client_id), normalize_key(&self.part_number))
    }
}

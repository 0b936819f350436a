//! BOM entity - the batch of part numbers scored together

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

/// One line of a BOM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    pub part_number: String,

    /// Units per board (defaults to 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

impl BomLine {
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            quantity: None,
        }
    }

    pub fn with_quantity(part_number: impl Into<String>, quantity: f64) -> Self {
        Self {
            part_number: part_number.into(),
            quantity: Some(quantity),
        }
    }
}

/// `dependent` needs `depends_on` to function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub dependent: String,
    pub depends_on: String,
}

impl DependencyEdge {
    pub fn new(dependent: impl Into<String>, depends_on: impl Into<String>) -> Self {
        Self {
            dependent: dependent.into(),
            depends_on: depends_on.into(),
        }
    }
}

/// A bill of materials with its intra-BOM dependencies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bom {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Client whose overrides apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Boards per week for this product
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_rate: Option<f64>,

    #[serde(default)]
    pub lines: Vec<BomLine>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyEdge>,
}

#[derive(Debug, Error)]
pub enum BomError {
    #[error("CSV parse error at row {row}: {message}")]
    Csv { row: usize, message: String },

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Invalid quantity '{value}' at row {row}")]
    InvalidQuantity { row: usize, value: String },
}

impl Bom {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Read BOM lines from CSV
    ///
    /// Recognized columns: `part_number` (or `pn`), `quantity` (or `qty`) and
    /// `depends_on`, a `;`-separated list of part numbers.
    pub fn from_csv<R: Read>(id: impl Into<String>, reader: R) -> Result<Self, BomError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| BomError::Csv {
                row: 1,
                message: e.to_string(),
            })?
            .clone();
        let header_map = build_header_map(&headers);

        let pn_col = ["part_number", "part number", "pn", "mpn"]
            .iter()
            .find_map(|h| header_map.get(*h).copied())
            .ok_or(BomError::MissingColumn("part_number"))?;
        let qty_col = ["quantity", "qty"]
            .iter()
            .find_map(|h| header_map.get(*h).copied());
        let deps_col = header_map.get("depends_on").copied();

        let mut bom = Bom::new(id);
        for (row_idx, result) in rdr.records().enumerate() {
            let row = row_idx + 2;
            let record = result.map_err(|e| BomError::Csv {
                row,
                message: e.to_string(),
            })?;

            let part_number = match record.get(pn_col).map(str::trim) {
                Some(pn) if !pn.is_empty() => pn.to_string(),
                _ => continue,
            };

            let quantity = match qty_col.and_then(|c| record.get(c)).map(str::trim) {
                Some(q) if !q.is_empty() => {
                    let value: f64 = q.parse().map_err(|_| BomError::InvalidQuantity {
                        row,
                        value: q.to_string(),
                    })?;
                    Some(value)
                }
                _ => None,
            };

            if let Some(deps) = deps_col.and_then(|c| record.get(c)) {
                for dep in deps.split(';').map(str::trim).filter(|d| !d.is_empty()) {
                    bom.dependencies
                        .push(DependencyEdge::new(part_number.clone(), dep));
                }
            }

            bom.lines.push(BomLine {
                part_number,
                quantity,
            });
        }

        Ok(bom)
    }
}

fn build_header_map(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase().trim().to_string(), i))
        .collect()
}

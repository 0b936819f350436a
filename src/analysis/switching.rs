//! Switching cost - effort to replace a component
//!
//! Informational only; it never changes the risk score.

use serde::{Deserialize, Serialize};

use crate::entities::{Category, ComponentRecord};

/// Redesign effort class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwitchingClass {
    Trivial,
    Moderate,
    Complex,
    Critical,
}

impl std::fmt::Display for SwitchingClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchingClass::Trivial => write!(f, "TRIVIAL"),
            SwitchingClass::Moderate => write!(f, "MODERATE"),
            SwitchingClass::Complex => write!(f, "COMPLEX"),
            SwitchingClass::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A keyword found in free text mapped to a value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRate {
    pub keyword: String,
    pub value: f64,
}

fn rates(pairs: &[(&str, f64)]) -> Vec<KeywordRate> {
    pairs
        .iter()
        .map(|(k, v)| KeywordRate {
            keyword: k.to_string(),
            value: *v,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchingSettings {
    /// Porting hours per KB of firmware, by OS keyword (first match wins)
    pub porting_rates: Vec<KeywordRate>,
    /// Rate used when code exists but the OS is not recognized
    pub default_porting_rate: f64,
    /// Effort multiplier by certification keyword (largest match wins)
    pub certification_multipliers: Vec<KeywordRate>,
    pub hours_per_qualification_week: f64,
    pub trivial_max_hours: f64,
    pub moderate_max_hours: f64,
    pub complex_max_hours: f64,
    /// Estimates used when no software or qualification data exists
    pub proprietary_floor_hours: f64,
    pub processor_floor_hours: f64,
    pub drop_in_floor_hours: f64,
}

impl Default for SwitchingSettings {
    fn default() -> Self {
        Self {
            porting_rates: rates(&[
                ("baremetal", 0.5),
                ("bare metal", 0.5),
                ("freertos", 1.0),
                ("zephyr", 1.0),
                ("rtos", 1.0),
                ("android", 2.5),
                ("linux", 2.0),
                ("windows", 1.5),
            ]),
            default_porting_rate: 0.5,
            certification_multipliers: rates(&[
                ("aec-q100", 1.5),
                ("aec-q101", 1.5),
                ("aec-q200", 1.3),
                ("automotive", 1.5),
                ("mil-std", 2.0),
                ("mil-prf", 2.0),
                ("military", 2.0),
                ("iec 62443", 1.3),
                ("iec 61508", 1.4),
                ("iso 26262", 1.5),
                ("do-254", 1.8),
                ("do-178", 1.8),
                ("medical", 1.6),
                ("iec 62304", 1.6),
                ("ul", 1.1),
            ]),
            hours_per_qualification_week: 40.0,
            trivial_max_hours: 100.0,
            moderate_max_hours: 500.0,
            complex_max_hours: 2000.0,
            proprietary_floor_hours: 200.0,
            processor_floor_hours: 80.0,
            drop_in_floor_hours: 8.0,
        }
    }
}

impl SwitchingSettings {
    pub fn classify(&self, hours: f64) -> SwitchingClass {
        if hours <= self.trivial_max_hours {
            SwitchingClass::Trivial
        } else if hours <= self.moderate_max_hours {
            SwitchingClass::Moderate
        } else if hours <= self.complex_max_hours {
            SwitchingClass::Complex
        } else {
            SwitchingClass::Critical
        }
    }
}

/// Estimated replacement effort
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchingCost {
    pub porting_hours: f64,
    pub qualification_hours: f64,
    pub certification_multiplier: f64,
    pub total_hours: f64,
    pub class: Option<SwitchingClass>,
    /// True when the total is a category-based floor rather than computed
    #[serde(default)]
    pub estimated: bool,
}

/// Keyword match; short keywords must match a whole word
fn mentions(text: &str, keyword: &str) -> bool {
    if keyword.len() <= 3 {
        text.split(|c: char| !c.is_alphanumeric())
            .any(|word| word == keyword)
    } else {
        text.contains(keyword)
    }
}

/// Estimate the effort to replace a component
pub fn switching_cost(record: &ComponentRecord, settings: &SwitchingSettings) -> SwitchingCost {
    let code_kb = record.sw_code_size_kb.filter(|kb| *kb > 0.0).unwrap_or(0.0);
    let os = record
        .os_type
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    let porting_rate = settings
        .porting_rates
        .iter()
        .find(|r| !os.is_empty() && os.contains(&r.keyword))
        .map(|r| r.value)
        .unwrap_or(if code_kb > 0.0 {
            settings.default_porting_rate
        } else {
            0.0
        });
    let porting_hours = code_kb * porting_rate;

    let qualification_weeks = record
        .requalification_weeks
        .filter(|w| *w > 0.0)
        .unwrap_or(0.0);
    let qualification_hours = qualification_weeks * settings.hours_per_qualification_week;

    let certification = record
        .certification
        .as_deref()
        .unwrap_or("")
        .to_lowercase();
    let certification_multiplier = settings
        .certification_multipliers
        .iter()
        .filter(|c| mentions(&certification, &c.keyword))
        .map(|c| c.value)
        .fold(1.0_f64, f64::max);

    let mut total_hours = (porting_hours + qualification_hours) * certification_multiplier;
    let mut estimated = false;

    if total_hours == 0.0 {
        let floor = if record.proprietary == Some(true) {
            Some(settings.proprietary_floor_hours)
        } else {
            match record.category {
                Some(Category::Mcu) | Some(Category::Mpu) => Some(settings.processor_floor_hours),
                Some(Category::Passive) | Some(Category::Connector) => {
                    Some(settings.drop_in_floor_hours)
                }
                _ => None,
            }
        };
        if let Some(floor) = floor {
            total_hours = floor;
            estimated = true;
        }
    }

    let class = if total_hours > 0.0 {
        Some(settings.classify(total_hours))
    } else {
        None
    };

    SwitchingCost {
        porting_hours,
        qualification_hours,
        certification_multiplier,
        total_hours,
        class,
        estimated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_mpu_with_automotive_certification() {
        let mut record = ComponentRecord::new("MPU-1");
        record.sw_code_size_kb = Some(500.0);
        record.os_type = Some("Embedded Linux".to_string());
        record.requalification_weeks = Some(10.0);
        record.certification = Some("AEC-Q100 Grade 2".to_string());

        let cost = switching_cost(&record, &SwitchingSettings::default());
        assert_eq!(cost.porting_hours, 1000.0);
        assert_eq!(cost.qualification_hours, 400.0);
        assert_eq!(cost.certification_multiplier, 1.5);
        assert_eq!(cost.total_hours, 2100.0);
        assert_eq!(cost.class, Some(SwitchingClass::Critical));
        assert!(!cost.estimated);
    }

    #[test]
    fn test_strongest_certification_multiplier_wins() {
        let mut record = ComponentRecord::new("X");
        record.requalification_weeks = Some(1.0);
        record.certification = Some("UL, MIL-STD-883".to_string());
        let cost = switching_cost(&record, &SwitchingSettings::default());
        assert_eq!(cost.certification_multiplier, 2.0);
        assert_eq!(cost.total_hours, 80.0);
    }

    #[test]
    fn test_short_keywords_need_whole_word() {
        let mut record = ComponentRecord::new("X");
        record.requalification_weeks = Some(1.0);
        record.certification = Some("multiple customer audits".to_string());
        let cost = switching_cost(&record, &SwitchingSettings::default());
        assert_eq!(cost.certification_multiplier, 1.0);
    }

    #[test]
    fn test_floor_estimates_without_data() {
        let settings = SwitchingSettings::default();

        let mut record = ComponentRecord::new("P");
        record.proprietary = Some(true);
        let cost = switching_cost(&record, &settings);
        assert_eq!(cost.total_hours, 200.0);
        assert_eq!(cost.class, Some(SwitchingClass::Moderate));
        assert!(cost.estimated);

        let mut record = ComponentRecord::new("C");
        record.category = Some(Category::Connector);
        assert_eq!(switching_cost(&record, &settings).total_hours, 8.0);

        let record = ComponentRecord::new("U");
        let cost = switching_cost(&record, &settings);
        assert_eq!(cost.total_hours, 0.0);
        assert_eq!(cost.class, None);
    }

    #[test]
    fn test_unknown_os_with_code_uses_default_rate() {
        let mut record = ComponentRecord::new("X");
        record.sw_code_size_kb = Some(100.0);
        record.os_type = Some("ThreadX".to_string());
        let cost = switching_cost(&record, &SwitchingSettings::default());
        assert_eq!(cost.porting_hours, 50.0);
        assert_eq!(cost.class, Some(SwitchingClass::Trivial));
    }
}

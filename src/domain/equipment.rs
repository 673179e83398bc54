// Equipment dataset domain models
use super::error::AnalyticsError;
use super::statistics::coerce;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric equipment parameter a chart can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Flowrate,
    Pressure,
    Temperature,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Flowrate, Parameter::Pressure, Parameter::Temperature];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Flowrate => "flowrate",
            Parameter::Pressure => "pressure",
            Parameter::Temperature => "temperature",
        }
    }

    /// Human readable title used in legends
    pub fn title(&self) -> &'static str {
        match self {
            Parameter::Flowrate => "Flowrate",
            Parameter::Pressure => "Pressure",
            Parameter::Temperature => "Temperature",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an uploaded CSV. Numeric fields stay as text until coerced.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquipmentRecord {
    pub equipment_name: String,
    pub equipment_type: String,
    #[serde(default, deserialize_with = "numeric_text")]
    pub flowrate: String,
    #[serde(default, deserialize_with = "numeric_text")]
    pub pressure: String,
    #[serde(default, deserialize_with = "numeric_text")]
    pub temperature: String,
}

impl EquipmentRecord {
    #[cfg(test)]
    pub fn new(
        equipment_name: impl Into<String>,
        equipment_type: impl Into<String>,
        flowrate: impl Into<String>,
        pressure: impl Into<String>,
        temperature: impl Into<String>,
    ) -> Self {
        Self {
            equipment_name: equipment_name.into(),
            equipment_type: equipment_type.into(),
            flowrate: flowrate.into(),
            pressure: pressure.into(),
            temperature: temperature.into(),
        }
    }

    pub fn raw(&self, parameter: Parameter) -> &str {
        match parameter {
            Parameter::Flowrate => &self.flowrate,
            Parameter::Pressure => &self.pressure,
            Parameter::Temperature => &self.temperature,
        }
    }

    /// Coerce one parameter; `index` is the record's position in upload order
    pub fn parameter_value(&self, index: usize, parameter: Parameter) -> Result<f64, AnalyticsError> {
        let raw = self.raw(parameter);
        coerce(raw).ok_or_else(|| AnalyticsError::MalformedValue {
            index,
            field: parameter,
            raw: raw.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl Averages {
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Flowrate => self.flowrate,
            Parameter::Pressure => self.pressure,
            Parameter::Temperature => self.temperature,
        }
    }
}

/// Backend-aggregated view of one uploaded dataset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetDetail {
    pub total_count: u64,
    pub equipment_type_distribution: BTreeMap<String, u64>,
    pub averages: Averages,
    #[serde(default)]
    pub equipment_details: Vec<EquipmentRecord>,
}

impl DatasetDetail {
    pub fn has_equipment_type(&self, equipment_type: &str) -> bool {
        self.equipment_type_distribution.contains_key(equipment_type)
    }
}

/// Entry of the user's upload history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetListing {
    pub id: i64,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UploadReceipt {
    pub dataset_id: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericText {
    Text(String),
    Number(serde_json::Number),
}

/// Accept either a JSON string or a JSON number and keep it as text.
/// A null or missing value becomes an empty string, which never coerces.
fn numeric_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumericText>::deserialize(deserializer)? {
        Some(NumericText::Text(text)) => text,
        Some(NumericText::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_accepts_numbers_and_strings() {
        let json = r#"{
            "total_count": 2,
            "averages": {"flowrate": 120.5, "pressure": 5.25, "temperature": 110.0},
            "equipment_type_distribution": {"Pump": 1, "Valve": 1},
            "equipment_details": [
                {"equipment_name": "P-1", "equipment_type": "Pump", "flowrate": 120, "pressure": "5.2", "temperature": 110.5},
                {"equipment_name": "V-1", "equipment_type": "Valve", "flowrate": "121", "pressure": 5.3, "temperature": null}
            ]
        }"#;

        let detail: DatasetDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.total_count, 2);
        assert_eq!(detail.equipment_details[0].flowrate, "120");
        assert_eq!(detail.equipment_details[0].pressure, "5.2");
        assert_eq!(detail.equipment_details[0].temperature, "110.5");
        assert_eq!(detail.equipment_details[1].temperature, "");
        assert!(detail.has_equipment_type("Valve"));
        assert!(!detail.has_equipment_type("Reactor"));
    }

    #[test]
    fn test_parameter_value_reports_index_and_field() {
        let record = EquipmentRecord::new("HX-2", "Heat Exchanger", "abc", " 4.5 ", "");

        assert_eq!(record.parameter_value(0, Parameter::Pressure), Ok(4.5));
        assert_eq!(
            record.parameter_value(7, Parameter::Flowrate),
            Err(AnalyticsError::MalformedValue {
                index: 7,
                field: Parameter::Flowrate,
                raw: "abc".to_string(),
            })
        );
        assert!(record.parameter_value(7, Parameter::Temperature).is_err());
    }

    #[test]
    fn test_parameter_serde_names() {
        assert_eq!(serde_json::to_string(&Parameter::Temperature).unwrap(), "\"temperature\"");
        let parsed: Parameter = serde_json::from_str("\"flowrate\"").unwrap();
        assert_eq!(parsed, Parameter::Flowrate);
        assert_eq!(Parameter::Pressure.title(), "Pressure");
    }

    #[test]
    fn test_listing_parses_backend_timestamp() {
        let json = r#"{"id": 4, "filename": "sample.csv", "uploaded_at": "2025-01-31T09:15:00.123456Z", "total_count": 15}"#;
        let listing: DatasetListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.id, 4);
        assert_eq!(listing.filename, "sample.csv");
    }
}

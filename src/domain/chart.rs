// Filter selection and chart series domain models
use super::equipment::Parameter;
use serde::{Deserialize, Serialize};

const ALL_TYPES: &str = "all";

/// Which equipment types the dynamic chart includes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EquipmentTypeFilter {
    #[default]
    All,
    Only(String),
}

impl EquipmentTypeFilter {
    pub fn matches(&self, equipment_type: &str) -> bool {
        match self {
            EquipmentTypeFilter::All => true,
            EquipmentTypeFilter::Only(selected) => selected == equipment_type,
        }
    }
}

impl From<String> for EquipmentTypeFilter {
    fn from(value: String) -> Self {
        if value == ALL_TYPES {
            EquipmentTypeFilter::All
        } else {
            EquipmentTypeFilter::Only(value)
        }
    }
}

impl From<EquipmentTypeFilter> for String {
    fn from(filter: EquipmentTypeFilter) -> Self {
        match filter {
            EquipmentTypeFilter::All => ALL_TYPES.to_string(),
            EquipmentTypeFilter::Only(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    #[default]
    Scatter,
    Bar,
}

/// The user's current (equipment type, parameter, chart kind) selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub equipment_type: EquipmentTypeFilter,
    pub parameter: Parameter,
    #[serde(default)]
    pub chart_kind: ChartKind,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            equipment_type: EquipmentTypeFilter::All,
            parameter: Parameter::Flowrate,
            chart_kind: ChartKind::Scatter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: u32,
    pub y: f64,
}

/// Renderable series, shaped for one chart kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartSeries {
    Line { labels: Vec<String>, values: Vec<f64> },
    Scatter { points: Vec<ScatterPoint> },
    Bar { labels: Vec<String>, values: Vec<f64> },
    /// Nothing matched the filter; render a "no data" state
    Empty { chart_kind: ChartKind },
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        match self {
            ChartSeries::Line { values, .. } | ChartSeries::Bar { values, .. } => values.len(),
            ChartSeries::Scatter { points } => points.len(),
            ChartSeries::Empty { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChartSeries::Empty { .. })
    }
}

// Aggregate summary - chart-ready view of the backend's counts and averages
use crate::domain::equipment::{Averages, DatasetDetail, Parameter};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSlice {
    pub label: String,
    pub count: u64,
    pub color_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageBar {
    pub label: &'static str,
    pub value: f64,
}

/// Counts and averages exactly as the backend computed them. Nothing here is
/// recomputed from `equipment_details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub total_count: u64,
    pub type_distribution: Vec<TypeSlice>,
    pub averages: Averages,
    pub average_bars: Vec<AverageBar>,
}

impl AggregateSummary {
    pub fn from_detail(detail: &DatasetDetail, type_palette: &[String]) -> Self {
        let type_distribution = detail
            .equipment_type_distribution
            .iter()
            .enumerate()
            .map(|(i, (label, count))| TypeSlice {
                label: label.clone(),
                count: *count,
                color_token: cycle(type_palette, i),
            })
            .collect();

        let average_bars = Parameter::ALL
            .iter()
            .map(|p| AverageBar {
                label: p.title(),
                value: detail.averages.get(*p),
            })
            .collect();

        Self {
            total_count: detail.total_count,
            type_distribution,
            averages: detail.averages,
            average_bars,
        }
    }

    pub fn type_labels(&self) -> Vec<&str> {
        self.type_distribution.iter().map(|s| s.label.as_str()).collect()
    }
}

fn cycle(palette: &[String], i: usize) -> String {
    if palette.is_empty() {
        return String::new();
    }
    palette[i % palette.len()].clone()
}

// Series binder - maps a filter selection onto a renderable series
use crate::domain::chart::{ChartKind, ChartSeries, FilterState, ScatterPoint};
use crate::domain::equipment::EquipmentRecord;
use crate::domain::error::AnalyticsError;

#[derive(Debug, Clone, PartialEq)]
pub struct BoundSeries {
    pub series: ChartSeries,
    /// Records that passed the type filter
    pub eligible: usize,
    /// Coercion failures among the eligible records, in record order
    pub excluded: Vec<AnalyticsError>,
}

/// Filter `records` by equipment type, then shape the selected parameter for
/// the selected chart kind.
///
/// Positions are 1-based over the filtered records, so filtering renumbers.
/// A record whose value fails to coerce is left out and its position is not
/// reused.
pub fn bind(state: &FilterState, records: &[EquipmentRecord]) -> BoundSeries {
    let mut eligible = 0;
    let mut excluded = Vec::new();
    let mut positioned: Vec<(u32, f64)> = Vec::new();

    let filtered = records
        .iter()
        .enumerate()
        .filter(|(_, r)| state.equipment_type.matches(&r.equipment_type));

    for (index, record) in filtered {
        eligible += 1;
        match record.parameter_value(index, state.parameter) {
            Ok(value) => positioned.push((eligible as u32, value)),
            Err(e) => excluded.push(e),
        }
    }

    BoundSeries {
        series: shape(state.chart_kind, positioned),
        eligible,
        excluded,
    }
}

fn shape(kind: ChartKind, positioned: Vec<(u32, f64)>) -> ChartSeries {
    if positioned.is_empty() {
        return ChartSeries::Empty { chart_kind: kind };
    }

    match kind {
        ChartKind::Scatter => ChartSeries::Scatter {
            points: positioned.into_iter().map(|(x, y)| ScatterPoint { x, y }).collect(),
        },
        ChartKind::Line => {
            let (labels, values) = labelled(positioned);
            ChartSeries::Line { labels, values }
        }
        ChartKind::Bar => {
            let (labels, values) = labelled(positioned);
            ChartSeries::Bar { labels, values }
        }
    }
}

fn labelled(positioned: Vec<(u32, f64)>) -> (Vec<String>, Vec<f64>) {
    positioned
        .into_iter()
        .map(|(position, value)| (format!("#{}", position), value))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::EquipmentTypeFilter;
    use crate::domain::equipment::Parameter;

    fn records() -> Vec<EquipmentRecord> {
        vec![
            EquipmentRecord::new("Pump-1", "Pump", "120", "10", "110"),
            EquipmentRecord::new("Valve-1", "Valve", "60", "20", "105"),
            EquipmentRecord::new("Pump-2", "Pump", "135", "15", "118"),
        ]
    }

    fn state(equipment_type: EquipmentTypeFilter, parameter: Parameter, chart_kind: ChartKind) -> FilterState {
        FilterState { equipment_type, parameter, chart_kind }
    }

    #[test]
    fn test_scatter_preserves_upload_order() {
        let bound = bind(
            &state(EquipmentTypeFilter::All, Parameter::Pressure, ChartKind::Scatter),
            &records(),
        );

        assert_eq!(
            bound.series,
            ChartSeries::Scatter {
                points: vec![
                    ScatterPoint { x: 1, y: 10.0 },
                    ScatterPoint { x: 2, y: 20.0 },
                    ScatterPoint { x: 3, y: 15.0 },
                ]
            }
        );
        assert_eq!(bound.eligible, 3);
        assert!(bound.excluded.is_empty());
    }

    #[test]
    fn test_filtering_renumbers_labels() {
        let pumps = EquipmentTypeFilter::Only("Pump".to_string());

        let line = bind(&state(pumps.clone(), Parameter::Flowrate, ChartKind::Line), &records());
        assert_eq!(
            line.series,
            ChartSeries::Line {
                labels: vec!["#1".to_string(), "#2".to_string()],
                values: vec![120.0, 135.0],
            }
        );

        let bar = bind(&state(pumps, Parameter::Temperature, ChartKind::Bar), &records());
        assert_eq!(
            bar.series,
            ChartSeries::Bar {
                labels: vec!["#1".to_string(), "#2".to_string()],
                values: vec![110.0, 118.0],
            }
        );
    }

    #[test]
    fn test_no_matching_type_gives_empty_marker() {
        let bound = bind(
            &state(EquipmentTypeFilter::Only("Reactor".to_string()), Parameter::Flowrate, ChartKind::Bar),
            &records(),
        );
        assert_eq!(bound.series, ChartSeries::Empty { chart_kind: ChartKind::Bar });
        assert_eq!(bound.eligible, 0);

        let bound = bind(&FilterState::default(), &[]);
        assert_eq!(bound.series, ChartSeries::Empty { chart_kind: ChartKind::Scatter });
    }

    #[test]
    fn test_malformed_values_are_excluded_and_reported() {
        let mut records = records();
        records[1].pressure = "n/a".to_string();

        let bound = bind(
            &state(EquipmentTypeFilter::All, Parameter::Pressure, ChartKind::Line),
            &records,
        );

        assert_eq!(
            bound.series,
            ChartSeries::Line {
                labels: vec!["#1".to_string(), "#3".to_string()],
                values: vec![10.0, 15.0],
            }
        );
        assert_eq!(bound.eligible, 3);
        assert_eq!(
            bound.excluded,
            vec![AnalyticsError::MalformedValue {
                index: 1,
                field: Parameter::Pressure,
                raw: "n/a".to_string(),
            }]
        );
    }

    #[test]
    fn test_all_malformed_is_empty_not_an_error() {
        let records = vec![EquipmentRecord::new("X", "Pump", "", "", "")];
        let bound = bind(&FilterState::default(), &records);
        assert!(bound.series.is_empty());
        assert_eq!(bound.excluded.len(), 1);
    }

    #[test]
    fn test_bind_is_idempotent() {
        let s = state(EquipmentTypeFilter::All, Parameter::Temperature, ChartKind::Line);
        let records = records();
        assert_eq!(bind(&s, &records), bind(&s, &records));
    }
}

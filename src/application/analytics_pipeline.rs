// Analytics pipeline - derives every chart-ready structure from one dataset
use crate::application::aggregate_summary::AggregateSummary;
use crate::application::series_binder::{bind, BoundSeries};
use crate::domain::chart::{ChartSeries, FilterState};
use crate::domain::distribution::{decompose, ParameterDistribution, ParameterPalette};
use crate::domain::equipment::{DatasetDetail, Parameter};
use crate::domain::error::AnalyticsError;
use crate::domain::statistics::summarize;
use crate::infrastructure::config::{default_palette, AnalyticsSettings};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one derived structure. A failure stays local to its chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact<T> {
    Ready(T),
    Failed(AnalyticsError),
}

impl<T> Artifact<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Artifact::Ready(value) => Some(value),
            Artifact::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AnalyticsError> {
        match self {
            Artifact::Ready(_) => None,
            Artifact::Failed(e) => Some(e),
        }
    }
}

impl<T> From<Result<T, AnalyticsError>> for Artifact<T> {
    fn from(result: Result<T, AnalyticsError>) -> Self {
        match result {
            Ok(value) => Artifact::Ready(value),
            Err(e) => Artifact::Failed(e),
        }
    }
}

/// The filterable chart together with its legend metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicChart {
    pub filter: FilterState,
    pub title: &'static str,
    pub color_token: String,
    pub series: ChartSeries,
    pub excluded: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardArtifacts {
    pub summary: AggregateSummary,
    pub distributions: BTreeMap<Parameter, Artifact<ParameterDistribution>>,
    pub series: Artifact<DynamicChart>,
}

#[derive(Debug, Clone)]
pub struct AnalyticsPipeline {
    palettes: Vec<ParameterPalette>,
    type_palette: Vec<String>,
    malformed_tolerance: f64,
}

impl AnalyticsPipeline {
    pub fn new(settings: &AnalyticsSettings) -> Self {
        // one palette per parameter, configured entries win over defaults
        let palettes = Parameter::ALL
            .iter()
            .map(|p| {
                settings
                    .palettes
                    .iter()
                    .find(|palette| palette.parameter == *p)
                    .cloned()
                    .unwrap_or_else(|| default_palette(*p))
            })
            .collect();

        Self {
            palettes,
            type_palette: settings.type_palette.clone(),
            malformed_tolerance: settings.malformed_tolerance,
        }
    }

    pub fn derive(&self, detail: &DatasetDetail, filter: &FilterState) -> DashboardArtifacts {
        let summary = AggregateSummary::from_detail(detail, &self.type_palette);

        let distributions: BTreeMap<Parameter, Artifact<ParameterDistribution>> = self
            .palettes
            .iter()
            .map(|palette| (palette.parameter, Artifact::from(self.derive_distribution(detail, palette))))
            .collect();

        for (parameter, artifact) in &distributions {
            if let Some(e) = artifact.error() {
                tracing::warn!("{} distribution unavailable: {}", parameter, e);
            }
        }

        DashboardArtifacts {
            summary,
            distributions,
            series: self.derive_series(detail, filter),
        }
    }

    /// Only the dynamic chart depends on the filter
    pub fn derive_series(&self, detail: &DatasetDetail, filter: &FilterState) -> Artifact<DynamicChart> {
        let BoundSeries {
            series,
            eligible,
            excluded,
        } = bind(filter, &detail.equipment_details);

        let result = self.check_tolerance(filter.parameter, eligible, &excluded).map(|_| DynamicChart {
            filter: filter.clone(),
            title: filter.parameter.title(),
            color_token: self.palette(filter.parameter).series_color().to_string(),
            series,
            excluded: excluded.len(),
        });

        let artifact = Artifact::from(result);
        match artifact.ready() {
            Some(chart) if chart.series.is_empty() => {
                tracing::debug!("No {} points for {:?}", filter.parameter, filter.equipment_type);
            }
            Some(chart) => {
                tracing::debug!(
                    "Bound {} {} points for {:?} ({} excluded)",
                    chart.series.len(),
                    filter.parameter,
                    filter.equipment_type,
                    chart.excluded
                );
            }
            None => {}
        }
        artifact
    }

    pub fn derive_distribution(
        &self,
        detail: &DatasetDetail,
        palette: &ParameterPalette,
    ) -> Result<ParameterDistribution, AnalyticsError> {
        let parameter = palette.parameter;
        let mut values = Vec::with_capacity(detail.equipment_details.len());
        let mut excluded = Vec::new();

        for (index, record) in detail.equipment_details.iter().enumerate() {
            match record.parameter_value(index, parameter) {
                Ok(value) => values.push(value),
                Err(e) => excluded.push(e),
            }
        }

        self.check_tolerance(parameter, detail.equipment_details.len(), &excluded)?;

        let summary = summarize(&values).map_err(|_| AnalyticsError::EmptySample { parameter })?;
        Ok(ParameterDistribution {
            parameter,
            summary,
            segments: decompose(&summary, palette),
        })
    }

    fn palette(&self, parameter: Parameter) -> &ParameterPalette {
        let index = Parameter::ALL.iter().position(|p| *p == parameter).unwrap_or(0);
        &self.palettes[index]
    }

    /// Log every excluded record and fail when too large a share was dropped
    fn check_tolerance(
        &self,
        parameter: Parameter,
        eligible: usize,
        excluded: &[AnalyticsError],
    ) -> Result<(), AnalyticsError> {
        for e in excluded {
            tracing::warn!("Excluding record from {} statistics: {}", parameter, e);
        }

        if eligible == 0 || excluded.is_empty() {
            return Ok(());
        }

        let ratio = excluded.len() as f64 / eligible as f64;
        if ratio > self.malformed_tolerance {
            return Err(AnalyticsError::ExcessiveMalformed {
                parameter,
                excluded: excluded.len(),
                eligible,
            });
        }
        Ok(())
    }
}

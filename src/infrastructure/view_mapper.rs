// Mapper to convert session state into renderer-facing JSON views
use crate::application::aggregate_summary::AggregateSummary;
use crate::application::analytics_pipeline::{Artifact, DynamicChart};
use crate::application::dashboard_session::{ReadyDashboard, SessionPhase};
use crate::domain::chart::FilterState;
use crate::domain::distribution::ParameterDistribution;
use crate::domain::equipment::{EquipmentRecord, Parameter};
use crate::domain::error::AnalyticsError;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArtifactView<T: Serialize> {
    Ready { data: T },
    Failed { reason: &'static str, message: String },
}

#[derive(Debug, Serialize)]
pub struct DistributionView {
    pub parameter: Parameter,
    pub title: String,
    #[serde(flatten)]
    pub artifact: ArtifactView<ParameterDistribution>,
}

#[derive(Debug, Serialize)]
pub struct RecordView {
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: String,
    pub pressure: String,
    pub temperature: String,
}

#[derive(Debug, Serialize)]
pub struct ReadyView {
    pub dataset_id: i64,
    pub filter: FilterState,
    /// Options for the equipment type selector, besides "all"
    pub equipment_types: Vec<String>,
    pub summary: AggregateSummary,
    pub distributions: Vec<DistributionView>,
    pub dynamic_chart: ArtifactView<DynamicChart>,
    pub records: Vec<RecordView>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DashboardView {
    Idle,
    Loading { dataset_id: i64 },
    Ready(Box<ReadyView>),
}

pub fn session_to_view(phase: &SessionPhase) -> DashboardView {
    match phase {
        SessionPhase::Idle => DashboardView::Idle,
        SessionPhase::Loading { dataset_id, .. } => DashboardView::Loading {
            dataset_id: *dataset_id,
        },
        SessionPhase::Ready(ready) => DashboardView::Ready(Box::new(ready_to_view(ready))),
    }
}

pub fn ready_to_view(ready: &ReadyDashboard) -> ReadyView {
    let summary = ready.artifacts.summary.clone();

    let distributions = ready
        .artifacts
        .distributions
        .iter()
        .map(|(parameter, artifact)| DistributionView {
            parameter: *parameter,
            title: format!("{} Distribution", parameter.title()),
            artifact: artifact_to_view(artifact),
        })
        .collect();

    let records = ready
        .detail
        .equipment_details
        .iter()
        .map(record_to_view)
        .collect();

    ReadyView {
        dataset_id: ready.dataset_id,
        filter: ready.filter.clone(),
        equipment_types: summary.type_labels().into_iter().map(str::to_string).collect(),
        summary,
        distributions,
        dynamic_chart: artifact_to_view(&ready.artifacts.series),
        records,
    }
}

pub fn artifact_to_view<T: Serialize + Clone>(artifact: &Artifact<T>) -> ArtifactView<T> {
    match artifact {
        Artifact::Ready(data) => ArtifactView::Ready { data: data.clone() },
        Artifact::Failed(e) => ArtifactView::Failed {
            reason: error_code(e),
            message: e.to_string(),
        },
    }
}

fn record_to_view(record: &EquipmentRecord) -> RecordView {
    RecordView {
        equipment_name: record.equipment_name.clone(),
        equipment_type: record.equipment_type.clone(),
        flowrate: record.flowrate.clone(),
        pressure: record.pressure.clone(),
        temperature: record.temperature.clone(),
    }
}

/// Stable machine-readable name for an error
pub fn error_code(error: &AnalyticsError) -> &'static str {
    match error {
        AnalyticsError::MalformedValue { .. } => "malformed_value",
        AnalyticsError::EmptySample { .. } => "empty_sample",
        AnalyticsError::ExcessiveMalformed { .. } => "excessive_malformed",
        AnalyticsError::Transport(_) => "transport",
        AnalyticsError::NotFound { .. } => "not_found",
        AnalyticsError::Rejected(_) => "rejected",
        AnalyticsError::UnknownEquipmentType(_) => "unknown_equipment_type",
        AnalyticsError::Superseded { .. } => "superseded",
        AnalyticsError::NotReady => "not_ready",
    }
}

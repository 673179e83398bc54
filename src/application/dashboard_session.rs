// Dashboard session - the selected dataset, its filter and derived charts
use crate::application::analytics_pipeline::{AnalyticsPipeline, Artifact, DashboardArtifacts, DynamicChart};
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::chart::{EquipmentTypeFilter, FilterState};
use crate::domain::equipment::DatasetDetail;
use crate::domain::error::AnalyticsError;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A loaded dataset with everything derived from it. Never mutated; a filter
/// change produces a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyDashboard {
    pub dataset_id: i64,
    pub detail: Arc<DatasetDetail>,
    pub filter: FilterState,
    pub artifacts: DashboardArtifacts,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    Idle,
    Loading {
        dataset_id: i64,
        /// Restored if the load fails in transit
        previous: Option<Arc<ReadyDashboard>>,
    },
    Ready(Arc<ReadyDashboard>),
}

impl SessionPhase {
    fn last_ready(&self) -> Option<Arc<ReadyDashboard>> {
        match self {
            SessionPhase::Idle => None,
            SessionPhase::Loading { previous, .. } => previous.clone(),
            SessionPhase::Ready(ready) => Some(ready.clone()),
        }
    }
}

struct SessionState {
    phase: SessionPhase,
    /// Bumped by every selection or reset; a load only lands if its generation is current
    generation: u64,
}

pub struct DashboardSession {
    repository: Arc<dyn DatasetRepository>,
    pipeline: AnalyticsPipeline,
    state: Mutex<SessionState>,
}

impl DashboardSession {
    pub fn new(repository: Arc<dyn DatasetRepository>, pipeline: AnalyticsPipeline) -> Self {
        Self {
            repository,
            pipeline,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Idle,
                generation: 0,
            }),
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase.clone()
    }

    /// Load a dataset and derive all charts with the default filter.
    ///
    /// A newer selection made while this one is in flight wins: this call then
    /// returns `Superseded` and its result is dropped.
    pub async fn select_dataset(&self, dataset_id: i64) -> Result<Arc<ReadyDashboard>, AnalyticsError> {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            let previous = state.phase.last_ready();
            state.phase = SessionPhase::Loading { dataset_id, previous };
            state.generation
        };
        tracing::info!("Loading dataset {}", dataset_id);

        // the lock is not held while the backend is queried
        let fetched = self.repository.fetch_dataset_detail(dataset_id).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::warn!("Discarding superseded load of dataset {}", dataset_id);
            return Err(AnalyticsError::Superseded { dataset_id });
        }

        let previous = match std::mem::replace(&mut state.phase, SessionPhase::Idle) {
            SessionPhase::Loading { previous, .. } => previous,
            _ => None,
        };

        match fetched {
            Ok(detail) => {
                let filter = FilterState::default();
                let artifacts = self.pipeline.derive(&detail, &filter);
                let ready = Arc::new(ReadyDashboard {
                    dataset_id,
                    detail: Arc::new(detail),
                    filter,
                    artifacts,
                });
                state.phase = SessionPhase::Ready(ready.clone());
                tracing::info!(
                    "Dataset {} ready with {} records",
                    dataset_id,
                    ready.detail.equipment_details.len()
                );
                Ok(ready)
            }
            Err(e @ AnalyticsError::NotFound { .. }) => {
                tracing::warn!("Dataset {} vanished: {}", dataset_id, e);
                Err(e)
            }
            Err(e) => {
                tracing::error!("Failed to load dataset {}: {}", dataset_id, e);
                if let Some(ready) = previous {
                    state.phase = SessionPhase::Ready(ready);
                }
                Err(e)
            }
        }
    }

    /// Rebind only the dynamic chart; summaries and distributions are reused
    pub async fn apply_filter(&self, filter: FilterState) -> Result<Artifact<DynamicChart>, AnalyticsError> {
        let mut state = self.state.lock().await;
        let current = match &state.phase {
            SessionPhase::Ready(ready) => ready.clone(),
            _ => return Err(AnalyticsError::NotReady),
        };

        if let EquipmentTypeFilter::Only(name) = &filter.equipment_type {
            if !current.detail.has_equipment_type(name) {
                return Err(AnalyticsError::UnknownEquipmentType(name.clone()));
            }
        }

        let series = self.pipeline.derive_series(&current.detail, &filter);
        let mut artifacts = current.artifacts.clone();
        artifacts.series = series.clone();

        state.phase = SessionPhase::Ready(Arc::new(ReadyDashboard {
            dataset_id: current.dataset_id,
            detail: current.detail.clone(),
            filter,
            artifacts,
        }));
        Ok(series)
    }

    /// Delete on the backend; if it was the selected dataset, return to idle
    pub async fn delete_dataset(&self, dataset_id: i64) -> Result<(), AnalyticsError> {
        let result = self.repository.delete_dataset(dataset_id).await;
        if matches!(result, Ok(()) | Err(AnalyticsError::NotFound { .. })) {
            self.forget(dataset_id).await;
        }
        result
    }

    /// Drop the selection and anything in flight
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.phase = SessionPhase::Idle;
    }

    async fn forget(&self, dataset_id: i64) {
        let mut state = self.state.lock().await;
        let reset = match &mut state.phase {
            SessionPhase::Idle => false,
            SessionPhase::Ready(ready) => ready.dataset_id == dataset_id,
            SessionPhase::Loading { dataset_id: loading, previous } => {
                if previous.as_ref().is_some_and(|p| p.dataset_id == dataset_id) {
                    *previous = None;
                }
                *loading == dataset_id
            }
        };

        if reset {
            tracing::info!("Dataset {} removed, session reset", dataset_id);
            state.generation += 1;
            state.phase = SessionPhase::Idle;
        }
    }
}

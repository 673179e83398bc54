// Application state for HTTP handlers
use crate::application::dashboard_session::DashboardSession;
use crate::application::dataset_service::DatasetService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dataset_service: DatasetService,
    pub session: Arc<DashboardSession>,
}

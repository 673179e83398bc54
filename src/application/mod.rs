// Application layer - Analytics pipeline and dataset use cases
pub mod aggregate_summary;
pub mod analytics_pipeline;
pub mod dashboard_session;
pub mod dataset_repository;
pub mod dataset_service;
pub mod series_binder;

#[cfg(test)]
pub mod testing;

// Repository trait for the dataset backend
use crate::domain::equipment::{DatasetDetail, DatasetListing, UploadReceipt};
use crate::domain::error::AnalyticsError;
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Parsed and aggregated view of one dataset
    async fn fetch_dataset_detail(&self, dataset_id: i64) -> Result<DatasetDetail, AnalyticsError>;

    /// Upload history, newest first
    async fn fetch_dataset_list(&self) -> Result<Vec<DatasetListing>, AnalyticsError>;

    async fn upload_dataset(&self, filename: &str, contents: Bytes) -> Result<UploadReceipt, AnalyticsError>;

    async fn delete_dataset(&self, dataset_id: i64) -> Result<(), AnalyticsError>;

    /// PDF report, passed through untouched
    async fn fetch_report(&self, dataset_id: i64) -> Result<Bytes, AnalyticsError>;
}

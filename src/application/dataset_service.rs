// Dataset service - Use cases for listing, uploading and reporting on datasets
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::equipment::{DatasetListing, UploadReceipt};
use crate::domain::error::AnalyticsError;
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct DatasetService {
    repository: Arc<dyn DatasetRepository>,
    history_limit: usize,
}

impl DatasetService {
    pub fn new(repository: Arc<dyn DatasetRepository>, history_limit: usize) -> Self {
        Self {
            repository,
            history_limit,
        }
    }

    /// Most recent uploads; the backend keeps at most `history_limit` per user
    pub async fn list_datasets(&self) -> Result<Vec<DatasetListing>, AnalyticsError> {
        let mut listings = self.repository.fetch_dataset_list().await?;
        listings.truncate(self.history_limit);
        Ok(listings)
    }

    pub async fn upload_dataset(&self, filename: &str, contents: Bytes) -> Result<UploadReceipt, AnalyticsError> {
        if !filename.ends_with(".csv") {
            return Err(AnalyticsError::Rejected(format!(
                "{} is not a CSV file",
                filename
            )));
        }

        let receipt = self.repository.upload_dataset(filename, contents).await?;
        tracing::info!("Uploaded {} as dataset {}", filename, receipt.dataset_id);
        Ok(receipt)
    }

    pub async fn fetch_report(&self, dataset_id: i64) -> Result<Bytes, AnalyticsError> {
        self.repository.fetch_report(dataset_id).await
    }
}

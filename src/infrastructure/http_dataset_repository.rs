// Dataset backend repository over its REST API
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::equipment::{DatasetDetail, DatasetListing, UploadReceipt};
use crate::domain::error::AnalyticsError;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct HttpDatasetRepository {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct UploadedDataset {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}

impl HttpDatasetRepository {
    pub fn new(base_url: String, token: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build dataset backend client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, accept: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .header("Accept", accept);

        if self.token.is_empty() {
            builder
        } else {
            builder.header("Authorization", format!("Token {}", self.token))
        }
    }

    /// Send and map non-success statuses onto the error taxonomy
    async fn execute(&self, builder: RequestBuilder, dataset_id: Option<i64>) -> Result<Response, AnalyticsError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Dataset backend request failed: {}", e);
            AnalyticsError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = classify_failure(status, &body, dataset_id);
        tracing::error!("Dataset backend answered {}: {}", status, error);
        Err(error)
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, AnalyticsError> {
        response
            .json::<T>()
            .await
            .context("Failed to parse dataset backend response")
            .map_err(|e| AnalyticsError::Transport(format!("{:#}", e)))
    }
}

/// 404 on a dataset route means the dataset is gone, 400 means the backend
/// rejected the input, anything else is a transport problem
fn classify_failure(status: StatusCode, body: &str, dataset_id: Option<i64>) -> AnalyticsError {
    match (status, dataset_id) {
        (StatusCode::NOT_FOUND, Some(dataset_id)) => AnalyticsError::NotFound { dataset_id },
        (StatusCode::BAD_REQUEST, _) => AnalyticsError::Rejected(backend_message(body)),
        _ => AnalyticsError::Transport(format!("status {}: {}", status, backend_message(body))),
    }
}

fn backend_message(body: &str) -> String {
    match serde_json::from_str::<BackendError>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl DatasetRepository for HttpDatasetRepository {
    async fn fetch_dataset_detail(&self, dataset_id: i64) -> Result<DatasetDetail, AnalyticsError> {
        let path = format!("dataset/{}/", dataset_id);
        let response = self.execute(self.request(Method::GET, &path, JSON), Some(dataset_id)).await?;
        let detail: DatasetDetail = Self::decode(response).await?;

        tracing::debug!(
            "Fetched dataset {}: {} records, {} types",
            dataset_id,
            detail.equipment_details.len(),
            detail.equipment_type_distribution.len()
        );
        Ok(detail)
    }

    async fn fetch_dataset_list(&self) -> Result<Vec<DatasetListing>, AnalyticsError> {
        let response = self.execute(self.request(Method::GET, "datasets-list/", JSON), None).await?;
        Self::decode(response).await
    }

    async fn upload_dataset(&self, filename: &str, contents: Bytes) -> Result<UploadReceipt, AnalyticsError> {
        let part = Part::bytes(contents.to_vec())
            .file_name(filename.to_string())
            .mime_str("text/csv")
            .map_err(|e| AnalyticsError::Transport(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .execute(self.request(Method::POST, "upload/", JSON).multipart(form), None)
            .await?;
        let uploaded: UploadedDataset = Self::decode(response).await?;
        Ok(UploadReceipt {
            dataset_id: uploaded.id,
        })
    }

    async fn delete_dataset(&self, dataset_id: i64) -> Result<(), AnalyticsError> {
        let path = format!("dataset/{}/delete/", dataset_id);
        self.execute(self.request(Method::DELETE, &path, JSON), Some(dataset_id)).await?;
        Ok(())
    }

    async fn fetch_report(&self, dataset_id: i64) -> Result<Bytes, AnalyticsError> {
        let path = format!("dataset/{}/report/", dataset_id);
        let response = self
            .execute(
                self.request(Method::GET, &path, "application/pdf"),
                Some(dataset_id),
            )
            .await?;

        response
            .bytes()
            .await
            .map_err(|e| AnalyticsError::Transport(e.to_string()))
    }
}

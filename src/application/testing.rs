// In-memory dataset backend for service tests
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::equipment::{
    Averages, DatasetDetail, DatasetListing, EquipmentRecord, UploadReceipt,
};
use crate::domain::error::AnalyticsError;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Holds a detail fetch until the test releases it
pub struct Gate {
    pub started: oneshot::Sender<()>,
    pub release: oneshot::Receiver<()>,
}

#[derive(Default)]
pub struct InMemoryRepository {
    pub details: Mutex<HashMap<i64, DatasetDetail>>,
    pub listings: Vec<DatasetListing>,
    pub unreachable: Mutex<HashSet<i64>>,
    pub gates: Mutex<HashMap<i64, Gate>>,
    pub uploads: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<i64>>,
}

impl InMemoryRepository {
    pub fn with_datasets(ids: &[i64]) -> Self {
        let repo = Self::default();
        {
            let mut details = repo.details.lock().unwrap();
            for id in ids {
                details.insert(*id, sample_detail(*id));
            }
        }
        repo
    }

    /// Returns (started, release) handles for the next fetch of `dataset_id`
    pub fn gate(&self, dataset_id: i64) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(
            dataset_id,
            Gate {
                started: started_tx,
                release: release_rx,
            },
        );
        (started_rx, release_tx)
    }
}

/// `dataset_id + 1` records so datasets are distinguishable by size
pub fn sample_detail(dataset_id: i64) -> DatasetDetail {
    let types = ["Pump", "Valve", "Compressor"];
    let records: Vec<EquipmentRecord> = (0..=dataset_id)
        .map(|i| {
            EquipmentRecord::new(
                format!("EQ-{}", i),
                types[i as usize % types.len()],
                format!("{}", 100 + i * 10),
                format!("{}.5", 4 + i),
                format!("{}", 110 + i),
            )
        })
        .collect();

    let mut distribution = BTreeMap::new();
    for r in &records {
        *distribution.entry(r.equipment_type.clone()).or_insert(0) += 1;
    }

    DatasetDetail {
        total_count: records.len() as u64,
        equipment_type_distribution: distribution,
        averages: Averages { flowrate: 100.0, pressure: 5.0, temperature: 110.0 },
        equipment_details: records,
    }
}

#[async_trait]
impl DatasetRepository for InMemoryRepository {
    async fn fetch_dataset_detail(&self, dataset_id: i64) -> Result<DatasetDetail, AnalyticsError> {
        let gate = self.gates.lock().unwrap().remove(&dataset_id);
        if let Some(gate) = gate {
            let _ = gate.started.send(());
            let _ = gate.release.await;
        }

        if self.unreachable.lock().unwrap().contains(&dataset_id) {
            return Err(AnalyticsError::Transport("connection refused".to_string()));
        }
        self.details
            .lock()
            .unwrap()
            .get(&dataset_id)
            .cloned()
            .ok_or(AnalyticsError::NotFound { dataset_id })
    }

    async fn fetch_dataset_list(&self) -> Result<Vec<DatasetListing>, AnalyticsError> {
        Ok(self.listings.clone())
    }

    async fn upload_dataset(&self, filename: &str, _contents: Bytes) -> Result<UploadReceipt, AnalyticsError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(filename.to_string());
        Ok(UploadReceipt {
            dataset_id: uploads.len() as i64,
        })
    }

    async fn delete_dataset(&self, dataset_id: i64) -> Result<(), AnalyticsError> {
        match self.details.lock().unwrap().remove(&dataset_id) {
            Some(_) => {
                self.deleted.lock().unwrap().push(dataset_id);
                Ok(())
            }
            None => Err(AnalyticsError::NotFound { dataset_id }),
        }
    }

    async fn fetch_report(&self, dataset_id: i64) -> Result<Bytes, AnalyticsError> {
        if self.details.lock().unwrap().contains_key(&dataset_id) {
            Ok(Bytes::from_static(b"%PDF-1.4"))
        } else {
            Err(AnalyticsError::NotFound { dataset_id })
        }
    }
}

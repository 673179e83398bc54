// Analytics error taxonomy
use super::equipment::Parameter;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A numeric field could not be parsed; the record is excluded from the affected statistic
    #[error("record {index}: malformed {field} value {raw:?}")]
    MalformedValue {
        index: usize,
        field: Parameter,
        raw: String,
    },

    /// No eligible records for a required distribution
    #[error("no data for {parameter}")]
    EmptySample { parameter: Parameter },

    /// Too many records were excluded for the artifact to be trusted
    #[error("{excluded} of {eligible} {parameter} values are malformed")]
    ExcessiveMalformed {
        parameter: Parameter,
        excluded: usize,
        eligible: usize,
    },

    #[error("dataset backend unavailable: {0}")]
    Transport(String),

    #[error("dataset {dataset_id} not found")]
    NotFound { dataset_id: i64 },

    /// The backend refused an upload, or it was refused before reaching the backend
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("unknown equipment type: {0}")]
    UnknownEquipmentType(String),

    /// A newer selection replaced this load before it finished
    #[error("load of dataset {dataset_id} was superseded")]
    Superseded { dataset_id: i64 },

    #[error("no dataset is loaded")]
    NotReady,
}

impl AnalyticsError {
    /// Errors that scope to one chart rather than the whole request
    pub fn is_artifact_scoped(&self) -> bool {
        matches!(
            self,
            AnalyticsError::MalformedValue { .. }
                | AnalyticsError::EmptySample { .. }
                | AnalyticsError::ExcessiveMalformed { .. }
        )
    }
}

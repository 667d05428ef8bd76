use crate::domain::errors::PredictionError;
use crate::domain::market::{BarRequest, BarTable};
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for the inclusive range, in whatever column shape the source uses.
    async fn fetch_daily_bars(&self, request: &BarRequest) -> Result<BarTable, PredictionError>;

    fn name(&self) -> &str;
}

/// Logical names of the persisted heart-disease artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactName {
    Scaler,
    Classifier,
}

impl ArtifactName {
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactName::Scaler => "scaler.json",
            ArtifactName::Classifier => "model.json",
        }
    }
}

/// Read/write access to persisted model artifacts by logical name.
pub trait ArtifactStore: Send + Sync {
    fn read(&self, name: ArtifactName) -> Result<Vec<u8>, PredictionError>;

    fn write(&self, name: ArtifactName, bytes: &[u8]) -> Result<(), PredictionError>;
}

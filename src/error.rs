use inventory::InventoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("Seed catalog error: {0}")]
    Seed(#[from] serde_json::Error),

    #[error(transparent)]
    Describe(#[from] DescribeError),
}

/// Failures of the external description service. Callers on the vendor path
/// never see these: they are turned into the fallback sentence.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("Description service is not configured: missing API key")]
    MissingApiKey,

    #[error("Description request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Description service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Description service returned no text")]
    EmptyResponse,

    #[error("Description service timed out")]
    Timeout,
}

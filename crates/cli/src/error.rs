use connectors::error::RpcError;
use engine_config::settings::error::SettingsError;
use engine_core::error::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to set up the node client: {0}")]
    Client(#[from] RpcError),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CliError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CliError::Scan(ScanError::Cancelled))
    }
}

use connectors::error::RpcError;
use model::pagination::cursor::Cursor;
use std::time::Duration;
use thiserror::Error;

/// Fatal errors of a scan or enrichment run.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Fetch failed at cursor {cursor}: {source}")]
    Fetch {
        cursor: Cursor,
        #[source]
        source: RpcError,
    },

    #[error("Scan stalled: node reported more data but returned cursor {cursor} again")]
    Stalled { cursor: Cursor },

    #[error("Scan did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,
}

impl ScanError {
    /// True when the run was cut short by a request timeout or the deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            ScanError::DeadlineExceeded(_) => true,
            ScanError::Fetch { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

use crate::{error::ScanError, metrics::Metrics};
use connectors::paging::PageSource;
use model::{
    pagination::cursor::{Continuation, Cursor},
    records::result_set::ResultSet,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Drives a [`PageSource`] from a starting cursor until the node reports no
/// more data.
///
/// Pages are requested strictly one after another: each request needs the
/// cursor from the previous response. Any fetch error aborts the scan and
/// discards what was accumulated so far.
pub struct TableScanner {
    metrics: Metrics,
    cancel: CancellationToken,
    deadline: Option<Duration>,
}

impl TableScanner {
    pub fn new(metrics: Metrics, cancel: CancellationToken) -> Self {
        TableScanner {
            metrics,
            cancel,
            deadline: None,
        }
    }

    /// Bounds the whole scan, not individual requests.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub async fn scan(&self, source: &dyn PageSource, start: Cursor) -> Result<ResultSet, ScanError> {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, self.run(source, start))
                .await
                .map_err(|_| ScanError::DeadlineExceeded(limit))?,
            None => self.run(source, start).await,
        }
    }

    async fn run(&self, source: &dyn PageSource, start: Cursor) -> Result<ResultSet, ScanError> {
        let target = source.describe();
        info!("Scanning {} from {}", target, start);

        let mut cursor = start;
        let mut acc = ResultSet::new();

        loop {
            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                res = source.fetch_page(&cursor) => Some(res),
            };

            let page = match fetched {
                None => {
                    warn!("Scan of {} cancelled at {}", target, cursor);
                    return Err(ScanError::Cancelled);
                }
                Some(res) => res.map_err(|source| ScanError::Fetch {
                    cursor: cursor.clone(),
                    source,
                })?,
            };

            let row_count = page.row_count();
            self.metrics.increment_pages(1);
            self.metrics.increment_rows(row_count as u64);

            let continuation = page.continuation;
            if let Continuation::More(next) = &continuation
                && *next == cursor
            {
                return Err(ScanError::Stalled { cursor });
            }

            acc = acc.append(page.rows);
            info!(
                "{}: page {} at {} returned {} rows in {} ms ({} total)",
                target,
                acc.pages(),
                cursor,
                row_count,
                page.took_ms,
                acc.len()
            );

            match continuation {
                Continuation::Done => {
                    info!(
                        "Finished scanning {}: {} rows over {} pages",
                        target,
                        acc.len(),
                        acc.pages()
                    );
                    return Ok(acc);
                }
                Continuation::More(next) => cursor = next,
            }
        }
    }
}

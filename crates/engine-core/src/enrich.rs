use crate::{error::ScanError, metrics::Metrics};
use connectors::balance::BalanceSource;
use futures::future::join_all;
use model::records::enriched::{EnrichedRecord, FailedLookup};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Everything the enricher learned, folded batch by batch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Enrichment {
    pub records: Vec<EnrichedRecord>,
    pub failures: Vec<FailedLookup>,
    /// Size of every lookup group, in the order the groups ran.
    pub batch_sizes: Vec<usize>,
}

impl Enrichment {
    #[must_use]
    fn merge(mut self, batch: BatchOutcome) -> Self {
        self.batch_sizes.push(batch.records.len() + batch.failures.len());
        self.records.extend(batch.records);
        self.failures.extend(batch.failures);
        self
    }

    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

#[derive(Debug, Default)]
struct BatchOutcome {
    records: Vec<EnrichedRecord>,
    failures: Vec<FailedLookup>,
}

enum Lookup {
    Found(EnrichedRecord),
    Failed(FailedLookup),
}

/// Splits keys into consecutive groups of at most `batch_size`.
pub fn partition<T>(keys: &[T], batch_size: usize) -> Result<Vec<&[T]>, ScanError> {
    if batch_size == 0 {
        return Err(ScanError::InvalidBatchSize);
    }
    Ok(keys.chunks(batch_size).collect())
}

/// Looks up a balance for every account, at most `batch_size` at a time.
///
/// Each group runs to completion before the next one starts, so the number
/// of requests in flight never exceeds the batch size. A failed lookup is
/// recorded and the run carries on.
pub struct BatchEnricher {
    batch_size: usize,
    metrics: Metrics,
    cancel: CancellationToken,
}

impl BatchEnricher {
    pub fn new(
        batch_size: usize,
        metrics: Metrics,
        cancel: CancellationToken,
    ) -> Result<Self, ScanError> {
        if batch_size == 0 {
            return Err(ScanError::InvalidBatchSize);
        }

        Ok(BatchEnricher {
            batch_size,
            metrics,
            cancel,
        })
    }

    pub async fn enrich(
        &self,
        source: &dyn BalanceSource,
        accounts: &[String],
    ) -> Result<Enrichment, ScanError> {
        let batches = partition(accounts, self.batch_size)?;
        let batch_count = batches.len();
        info!(
            "Enriching {} accounts in {} batches of up to {}",
            accounts.len(),
            batch_count,
            self.batch_size
        );

        let mut acc = Enrichment::default();
        for (index, batch) in batches.into_iter().enumerate() {
            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                outcome = self.run_batch(source, batch) => Some(outcome),
            };

            let Some(outcome) = outcome else {
                warn!("Enrichment cancelled before batch {}", index + 1);
                return Err(ScanError::Cancelled);
            };

            self.metrics.increment_batches(1);
            self.metrics
                .increment_lookups(outcome.records.len() as u64, outcome.failures.len() as u64);

            acc = acc.merge(outcome);
            info!(
                "Batch {}/{} done: {} balances, {} failures so far",
                index + 1,
                batch_count,
                acc.records.len(),
                acc.failures.len()
            );
        }

        Ok(acc)
    }

    async fn run_batch(&self, source: &dyn BalanceSource, batch: &[String]) -> BatchOutcome {
        let lookups = batch.iter().map(|account| lookup(source, account));

        join_all(lookups)
            .await
            .into_iter()
            .fold(BatchOutcome::default(), |mut outcome, lookup| {
                match lookup {
                    Lookup::Found(record) => outcome.records.push(record),
                    Lookup::Failed(failure) => outcome.failures.push(failure),
                }
                outcome
            })
    }
}

async fn lookup(source: &dyn BalanceSource, account: &str) -> Lookup {
    match source.balance_of(account).await {
        Ok(Some(balance)) => {
            debug!("{} holds {}", account, balance);
            Lookup::Found(EnrichedRecord::new(account, balance))
        }
        Ok(None) => {
            warn!("Account {} is invalid: no balance row", account);
            Lookup::Failed(FailedLookup::missing_balance(account))
        }
        Err(err) => {
            warn!("Balance lookup for {} failed: {}", account, err);
            Lookup::Failed(FailedLookup::transport(account, err.to_string()))
        }
    }
}

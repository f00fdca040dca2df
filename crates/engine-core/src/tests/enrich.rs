use super::support::{FakeLedger, accounts};
use crate::{
    enrich::{BatchEnricher, partition},
    error::ScanError,
    metrics::Metrics,
};
use model::records::enriched::LookupFailure;
use std::{collections::HashSet, sync::atomic::Ordering};
use tokio_util::sync::CancellationToken;

fn enricher(batch_size: usize) -> (BatchEnricher, Metrics) {
    let metrics = Metrics::new();
    let enricher = BatchEnricher::new(batch_size, metrics.clone(), CancellationToken::new()).unwrap();
    (enricher, metrics)
}

#[test]
fn test_partition_group_sizes() {
    let keys = accounts("a", 250);
    let groups = partition(&keys, 100).unwrap();
    let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    for (n, b) in [(0, 3), (1, 1), (7, 3), (9, 3), (10, 100)] {
        let keys = accounts("k", n);
        let groups = partition(&keys, b).unwrap();
        assert_eq!(groups.len(), n.div_ceil(b), "n={n} b={b}");
        if let Some((last, full)) = groups.split_last() {
            assert!(full.iter().all(|g| g.len() == b));
            assert!(!last.is_empty() && last.len() <= b);
        }
    }

    assert!(matches!(partition(&keys, 0), Err(ScanError::InvalidBatchSize)));
}

#[test]
fn test_zero_batch_size_is_rejected() {
    let err = BatchEnricher::new(0, Metrics::new(), CancellationToken::new());
    assert!(matches!(err, Err(ScanError::InvalidBatchSize)));
}

#[tokio::test]
async fn test_250_accounts_in_three_batches() {
    let ledger = FakeLedger::default();
    let (enricher, metrics) = enricher(100);
    let keys = accounts("holder", 250);

    let result = enricher.enrich(&ledger, &keys).await.unwrap();

    assert_eq!(result.batch_sizes, vec![100, 100, 50]);
    assert_eq!(result.records.len(), 250);
    assert!(result.failures.is_empty());
    assert!(ledger.peak_in_flight.load(Ordering::SeqCst) <= 100);

    let seen: HashSet<&str> = result.records.iter().map(|r| r.account.as_str()).collect();
    assert_eq!(seen.len(), 250);
    assert!(result.records.iter().all(|r| r.balance == "1.0000 SEEDS"));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.batches_processed, 3);
    assert_eq!(snapshot.lookups_succeeded, 250);
    assert_eq!(snapshot.lookups_failed, 0);
}

#[tokio::test]
async fn test_batch_runs_lookups_concurrently_up_to_ceiling() {
    let ledger = FakeLedger::default();
    let (enricher, _) = enricher(4);
    let keys = accounts("holder", 10);

    let result = enricher.enrich(&ledger, &keys).await.unwrap();

    assert_eq!(result.batch_sizes, vec![4, 4, 2]);
    assert_eq!(ledger.peak_in_flight.load(Ordering::SeqCst), 4);
    assert_eq!(ledger.calls.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_mixed_accounts_split_between_records_and_failures() {
    let ledger = FakeLedger::default();
    let (enricher, metrics) = enricher(3);

    let mut keys = accounts("good", 5);
    keys.extend(accounts("bad", 3));
    keys.extend(accounts("down", 2));

    let result = enricher.enrich(&ledger, &keys).await.unwrap();

    assert_eq!(result.records.len(), 5);
    assert_eq!(result.failures.len(), 5);
    assert_eq!(result.total(), keys.len());
    assert!(result.records.iter().all(|r| r.account.starts_with("good")));

    let missing = result
        .failures
        .iter()
        .filter(|f| f.reason == LookupFailure::MissingBalance)
        .count();
    assert_eq!(missing, 3);
    assert!(
        result
            .failures
            .iter()
            .filter(|f| f.account.starts_with("down"))
            .all(|f| matches!(f.reason, LookupFailure::Transport(_)))
    );

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.lookups_succeeded, 5);
    assert_eq!(snapshot.lookups_failed, 5);
    assert_eq!(snapshot.batches_processed, 4);
}

#[tokio::test]
async fn test_no_accounts_no_batches() {
    let ledger = FakeLedger::default();
    let (enricher, _) = enricher(100);

    let result = enricher.enrich(&ledger, &[]).await.unwrap();

    assert_eq!(result.total(), 0);
    assert!(result.batch_sizes.is_empty());
    assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancelled_enrichment_stops_before_next_batch() {
    let ledger = FakeLedger::default();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let enricher = BatchEnricher::new(10, Metrics::new(), cancel).unwrap();

    let err = enricher
        .enrich(&ledger, &accounts("holder", 30))
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Cancelled));
    assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
}

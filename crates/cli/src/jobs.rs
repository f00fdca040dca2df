use connectors::{
    balance::TokenBalances,
    paging::{RowScan, ScopeScan},
    rpc::reader::ChainReader,
};
use engine_config::settings::scan::ScanSettings;
use engine_core::{
    enrich::{BatchEnricher, Enrichment},
    error::ScanError,
    metrics::Metrics,
    scanner::TableScanner,
    totals::AssetTotal,
};
use model::{pagination::cursor::Cursor, records::result_set::ResultSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Shared handles for one command invocation.
pub struct JobContext {
    pub settings: ScanSettings,
    pub reader: Arc<dyn ChainReader>,
    pub metrics: Metrics,
    pub cancel: CancellationToken,
}

impl JobContext {
    fn scanner(&self) -> TableScanner {
        TableScanner::new(self.metrics.clone(), self.cancel.clone())
            .with_deadline(self.settings.scan_deadline)
    }
}

/// Discovers every holder of the token by scope, then looks up each
/// holder's balance.
pub async fn collect_balances(ctx: &JobContext) -> Result<Enrichment, ScanError> {
    let token = &ctx.settings.token;
    let scopes = ScopeScan::new(
        ctx.reader.clone(),
        token.contract.clone(),
        token.table.clone(),
        ctx.settings.scope_page_limit,
    );

    let holders = ctx
        .scanner()
        .scan(&scopes, Cursor::first_scope())
        .await?
        .column("scope");
    info!("Found {} {} holder accounts", holders.len(), token.symbol);

    let enricher = BatchEnricher::new(
        ctx.settings.lookup_batch_size,
        ctx.metrics.clone(),
        ctx.cancel.clone(),
    )?;
    let balances = TokenBalances::new(ctx.reader.clone(), token.clone());
    let enrichment = enricher.enrich(&balances, &holders).await?;

    let total = AssetTotal::collect(enrichment.records.iter().map(|r| r.balance.as_str()));
    log_total("Balances", &total);

    Ok(enrichment)
}

/// Reads the whole planted table by primary key.
pub async fn collect_planted(ctx: &JobContext) -> Result<ResultSet, ScanError> {
    let planted = RowScan::new(
        ctx.reader.clone(),
        ctx.settings.planted.clone(),
        ctx.settings.row_page_limit,
    );

    let rows = ctx.scanner().scan(&planted, Cursor::first_key()).await?;

    let total = AssetTotal::collect(rows.rows().iter().filter_map(|row| row.get_str("planted")));
    log_total("Planted", &total);

    Ok(rows)
}

fn log_total(label: &str, total: &AssetTotal) {
    match &total.total {
        Some(sum) => info!(
            "{} total: {} across {} entries ({} skipped)",
            label, sum, total.counted, total.skipped
        ),
        None => info!("{} total: nothing to sum ({} skipped)", label, total.skipped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::{
        error::RpcError,
        rpc::wire::{TableRowsRequest, TableRowsResponse, TableScopeRequest, TableScopeResponse},
    };
    use engine_config::env::EnvVars;
    use serde_json::json;
    use std::collections::HashMap;

    /// A tiny in-memory node: three pages of holders, balances for all but
    /// one of them, and a planted table split over two pages.
    struct MemoryNode;

    #[async_trait]
    impl ChainReader for MemoryNode {
        async fn get_table_rows(
            &self,
            request: &TableRowsRequest,
        ) -> Result<TableRowsResponse, RpcError> {
            let body = if request.code == "harvst.seeds" {
                match request.lower_bound.as_str() {
                    "0" => json!({
                        "rows": [{"account": "alice", "planted": "10.0000 SEEDS"}],
                        "more": true,
                        "next_key": "3773036822876127232"
                    }),
                    _ => json!({
                        "rows": [{"account": "bob", "planted": "2.5000 SEEDS"}],
                        "more": false,
                        "next_key": ""
                    }),
                }
            } else {
                let balances: HashMap<&str, &str> =
                    HashMap::from([("alice", "22465.0000 SEEDS"), ("bob", "1.0000 SEEDS"), ("carol", "0.5000 SEEDS")]);
                match balances.get(request.scope.as_str()) {
                    Some(balance) => json!({"rows": [{"balance": balance}], "more": false, "next_key": ""}),
                    None => json!({"rows": [], "more": false, "next_key": ""}),
                }
            };
            Ok(serde_json::from_value(body).unwrap())
        }

        async fn get_table_by_scope(
            &self,
            request: &TableScopeRequest,
        ) -> Result<TableScopeResponse, RpcError> {
            let scope = |s: &str| json!({"code": "token.seeds", "scope": s, "table": "accounts", "payer": s, "count": 1});
            let body = match request.lower_bound.as_str() {
                "" => json!({"rows": [scope("alice"), scope("bob")], "more": "carol"}),
                "carol" => json!({"rows": [scope("carol")], "more": "dave"}),
                _ => json!({"rows": [scope("dave")], "more": ""}),
            };
            Ok(serde_json::from_value(body).unwrap())
        }
    }

    /// Serves one good scope page, then a page with no `more` field.
    struct TruncatingNode;

    #[async_trait]
    impl ChainReader for TruncatingNode {
        async fn get_table_rows(
            &self,
            _request: &TableRowsRequest,
        ) -> Result<TableRowsResponse, RpcError> {
            Ok(serde_json::from_value(json!({"code": 500, "message": "Internal Service Error"})).unwrap())
        }

        async fn get_table_by_scope(
            &self,
            request: &TableScopeRequest,
        ) -> Result<TableScopeResponse, RpcError> {
            let body = match request.lower_bound.as_str() {
                "" => json!({"rows": [{"scope": "alice"}], "more": "bob"}),
                _ => json!({"rows": [{"scope": "bob"}]}),
            };
            Ok(serde_json::from_value(body).unwrap())
        }
    }

    fn context(batch_size: &str) -> JobContext {
        let env = EnvVars::from_pairs([("CHAIN_SCAN_LOOKUP_BATCH_SIZE", batch_size)]);
        JobContext {
            settings: ScanSettings::from_env(&env).unwrap(),
            reader: Arc::new(MemoryNode),
            metrics: Metrics::new(),
            cancel: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn test_collect_balances_end_to_end() {
        let ctx = context("3");

        let enrichment = collect_balances(&ctx).await.unwrap();

        let mut found: Vec<(&str, &str)> = enrichment
            .records
            .iter()
            .map(|r| (r.account.as_str(), r.balance.as_str()))
            .collect();
        found.sort();
        assert_eq!(
            found,
            vec![
                ("alice", "22465.0000 SEEDS"),
                ("bob", "1.0000 SEEDS"),
                ("carol", "0.5000 SEEDS")
            ]
        );
        assert_eq!(enrichment.failures.len(), 1);
        assert_eq!(enrichment.failures[0].account, "dave");
        assert_eq!(enrichment.batch_sizes, vec![3, 1]);

        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.pages_fetched, 3);
        assert_eq!(snapshot.lookups_succeeded, 3);
        assert_eq!(snapshot.lookups_failed, 1);
    }

    #[tokio::test]
    async fn test_collect_planted_end_to_end() {
        let ctx = context("100");

        let rows = collect_planted(&ctx).await.unwrap();

        assert_eq!(rows.pages(), 2);
        assert_eq!(rows.column("account"), vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_cancelled_job_reports_cancellation() {
        let ctx = context("100");
        ctx.cancel.cancel();

        let err = collect_balances(&ctx).await.unwrap_err();
        assert!(matches!(err, ScanError::Cancelled));
    }

    #[tokio::test]
    async fn test_response_without_paging_fields_fails_the_job() {
        let mut ctx = context("100");
        ctx.reader = Arc::new(TruncatingNode);

        let err = collect_balances(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            ScanError::Fetch { ref cursor, source: RpcError::Malformed { .. } }
                if *cursor == Cursor::Scope("bob".into())
        ));
        assert_eq!(ctx.metrics.snapshot().lookups_succeeded, 0);

        let err = collect_planted(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            ScanError::Fetch { source: RpcError::Malformed { .. }, .. }
        ));
    }
}

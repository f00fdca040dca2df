use async_trait::async_trait;
use connectors::{balance::BalanceSource, error::RpcError, paging::PageSource};
use model::{
    pagination::{
        cursor::{Continuation, Cursor},
        page::Page,
    },
    records::row::Row,
};
use serde_json::json;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

pub fn scope_row(scope: &str) -> Row {
    serde_json::from_value(json!({
        "code": "token.seeds",
        "scope": scope,
        "table": "accounts",
        "payer": scope,
        "count": 1
    }))
    .unwrap()
}

pub fn accounts(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

/// Serves a fixed list of pages in order, whatever cursor is asked for.
pub struct ScriptedPages {
    pages: Mutex<Vec<Result<Page, RpcError>>>,
    pub requested: Mutex<Vec<Cursor>>,
}

impl ScriptedPages {
    pub fn new(pages: Vec<Page>) -> Self {
        Self::with_results(pages.into_iter().map(Ok).collect())
    }

    pub fn with_results(pages: Vec<Result<Page, RpcError>>) -> Self {
        ScriptedPages {
            pages: Mutex::new(pages),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }
}

#[async_trait]
impl PageSource for ScriptedPages {
    fn describe(&self) -> String {
        "scripted pages".to_string()
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page, RpcError> {
        self.requested.lock().unwrap().push(cursor.clone());
        let mut pages = self.pages.lock().unwrap();
        assert!(!pages.is_empty(), "scanner asked for a page past the script");
        pages.remove(0)
    }
}

/// A primary-key table served `limit` rows at a time, like a real node.
pub struct BackedTable {
    pub rows: Vec<Row>,
    pub limit: usize,
}

#[async_trait]
impl PageSource for BackedTable {
    fn describe(&self) -> String {
        "backed table".to_string()
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page, RpcError> {
        let start = match cursor {
            Cursor::PrimaryKey(key) => *key as usize,
            Cursor::Scope(_) => panic!("backed table only supports primary keys"),
        };
        let end = (start + self.limit).min(self.rows.len());
        let rows = self.rows[start.min(end)..end].to_vec();

        let continuation = if end < self.rows.len() {
            Continuation::More(Cursor::PrimaryKey(end as u64))
        } else {
            Continuation::Done
        };
        Ok(Page::new(rows, continuation))
    }
}

/// Never answers.
pub struct HangingSource;

#[async_trait]
impl PageSource for HangingSource {
    fn describe(&self) -> String {
        "hanging source".to_string()
    }

    async fn fetch_page(&self, _cursor: &Cursor) -> Result<Page, RpcError> {
        std::future::pending().await
    }
}

/// Balances keyed by account name prefix:
/// `bad*` has no balance row, `down*` fails at the transport level,
/// anything else holds `1.0000 SEEDS`.
#[derive(Default)]
pub struct FakeLedger {
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

#[async_trait]
impl BalanceSource for FakeLedger {
    async fn balance_of(&self, account: &str) -> Result<Option<String>, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        // Let every sibling in the batch start before anyone finishes.
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if account.starts_with("bad") {
            Ok(None)
        } else if account.starts_with("down") {
            Err(RpcError::Timeout {
                endpoint: "http://node/v1/chain/get_table_rows".to_string(),
            })
        } else {
            Ok(Some("1.0000 SEEDS".to_string()))
        }
    }
}

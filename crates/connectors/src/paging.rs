use crate::{
    error::RpcError,
    rpc::{
        reader::ChainReader,
        wire::{GET_TABLE_BY_SCOPE, GET_TABLE_ROWS, TableRowsRequest, TableScopeRequest},
    },
};
use async_trait::async_trait;
use model::{
    core::identifiers::TableId,
    pagination::{cursor::Cursor, page::Page},
};
use std::{sync::Arc, time::Instant};

/// Something a scanner can page through, one cursor at a time.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Human readable name used in logs.
    fn describe(&self) -> String;

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page, RpcError>;
}

/// Pages through the rows of one table by primary key.
pub struct RowScan {
    reader: Arc<dyn ChainReader>,
    table: TableId,
    limit: u32,
}

impl RowScan {
    pub fn new(reader: Arc<dyn ChainReader>, table: TableId, limit: u32) -> Self {
        RowScan {
            reader,
            table,
            limit,
        }
    }
}

#[async_trait]
impl PageSource for RowScan {
    fn describe(&self) -> String {
        format!("rows of {}", self.table)
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page, RpcError> {
        let start = Instant::now();
        let request = TableRowsRequest::new(&self.table, cursor.lower_bound(), self.limit);
        let response = self.reader.get_table_rows(&request).await?;

        let continuation = response
            .continuation()
            .map_err(|reason| RpcError::Malformed {
                endpoint: GET_TABLE_ROWS.to_string(),
                reason,
            })?;

        Ok(Page::new(response.into_rows(), continuation).with_timing(start.elapsed().as_millis()))
    }
}

/// Pages through the scopes a table has rows under.
pub struct ScopeScan {
    reader: Arc<dyn ChainReader>,
    code: String,
    table: String,
    limit: u32,
}

impl ScopeScan {
    pub fn new(
        reader: Arc<dyn ChainReader>,
        code: impl Into<String>,
        table: impl Into<String>,
        limit: u32,
    ) -> Self {
        ScopeScan {
            reader,
            code: code.into(),
            table: table.into(),
            limit,
        }
    }
}

#[async_trait]
impl PageSource for ScopeScan {
    fn describe(&self) -> String {
        format!("scopes of {}/{}", self.code, self.table)
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page, RpcError> {
        let start = Instant::now();
        let request = TableScopeRequest::new(
            self.code.clone(),
            self.table.clone(),
            cursor.lower_bound(),
            self.limit,
        );
        let response = self.reader.get_table_by_scope(&request).await?;

        let continuation = response
            .continuation()
            .map_err(|reason| RpcError::Malformed {
                endpoint: GET_TABLE_BY_SCOPE.to_string(),
                reason,
            })?;

        Ok(Page::new(response.into_rows(), continuation).with_timing(start.elapsed().as_millis()))
    }
}

//! Request and response bodies of the node's `/v1/chain` table endpoints.
//!
//! The two endpoints disagree on what `more` means. `get_table_rows` sends a
//! boolean (some older nodes send `"true"`/`"false"`) and puts the resume key
//! in `next_key`; `get_table_by_scope` sends the next scope name itself, with
//! an empty string once the scan is exhausted. Both are mapped onto
//! [`Continuation`] here and nowhere else.

use model::{
    core::identifiers::TableId,
    pagination::cursor::{Continuation, Cursor},
    records::row::Row,
};
use serde::{Deserialize, Serialize};

pub const GET_TABLE_ROWS: &str = "/v1/chain/get_table_rows";
pub const GET_TABLE_BY_SCOPE: &str = "/v1/chain/get_table_by_scope";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRowsRequest {
    pub json: bool,
    pub code: String,
    pub scope: String,
    pub table: String,
    pub lower_bound: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<String>,
    pub limit: u32,
}

impl TableRowsRequest {
    pub fn new(table: &TableId, lower_bound: impl Into<String>, limit: u32) -> Self {
        TableRowsRequest {
            json: true,
            code: table.code.clone(),
            scope: table.scope.clone(),
            table: table.table.clone(),
            lower_bound: lower_bound.into(),
            upper_bound: None,
            limit,
        }
    }

    pub fn with_upper_bound(mut self, upper_bound: impl Into<String>) -> Self {
        self.upper_bound = Some(upper_bound.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableScopeRequest {
    pub code: String,
    pub table: String,
    pub lower_bound: String,
    pub upper_bound: String,
    pub limit: u32,
}

impl TableScopeRequest {
    pub fn new(
        code: impl Into<String>,
        table: impl Into<String>,
        lower_bound: impl Into<String>,
        limit: u32,
    ) -> Self {
        TableScopeRequest {
            code: code.into(),
            table: table.into(),
            lower_bound: lower_bound.into(),
            upper_bound: String::new(),
            limit,
        }
    }
}

/// Raw `more` field as nodes actually send it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MoreFlag {
    Flag(bool),
    Token(String),
}

impl MoreFlag {
    /// `false`, `""` and `"false"` all mean the scan is over.
    pub fn is_falsy(&self) -> bool {
        match self {
            MoreFlag::Flag(flag) => !flag,
            MoreFlag::Token(token) => token.is_empty() || token == "false",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableRowsResponse {
    #[serde(default)]
    pub rows: Option<Vec<Row>>,
    #[serde(default)]
    pub more: Option<MoreFlag>,
    #[serde(default)]
    pub next_key: Option<String>,
}

impl TableRowsResponse {
    pub fn rows(&self) -> &[Row] {
        self.rows.as_deref().unwrap_or_default()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows.unwrap_or_default()
    }

    /// Resume key for a primary-key scan: `next_key` parsed as an integer.
    ///
    /// A page without `rows` or `more` is not a page at all (typically an
    /// error object from the node) and is rejected.
    pub fn continuation(&self) -> Result<Continuation, String> {
        let more = paging_fields(self.rows.is_some(), self.more.as_ref())?;
        if more.is_falsy() {
            return Ok(Continuation::Done);
        }

        let next_key = self.next_key.as_deref().unwrap_or("").trim();
        if next_key.is_empty() {
            return Err("'more' is set but 'next_key' is empty".to_string());
        }

        next_key
            .parse::<u64>()
            .map(|key| Continuation::More(Cursor::PrimaryKey(key)))
            .map_err(|_| format!("'next_key' {next_key:?} is not a numeric primary key"))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableScopeResponse {
    #[serde(default)]
    pub rows: Option<Vec<Row>>,
    #[serde(default)]
    pub more: Option<MoreFlag>,
}

impl TableScopeResponse {
    pub fn rows(&self) -> &[Row] {
        self.rows.as_deref().unwrap_or_default()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows.unwrap_or_default()
    }

    /// Resume key for a scope scan: `more` is the next scope name.
    pub fn continuation(&self) -> Result<Continuation, String> {
        match paging_fields(self.rows.is_some(), self.more.as_ref())? {
            more if more.is_falsy() => Ok(Continuation::Done),
            MoreFlag::Token(scope) => Ok(Continuation::More(Cursor::Scope(scope.clone()))),
            MoreFlag::Flag(_) => Err("'more' is a boolean, expected the next scope".to_string()),
        }
    }
}

fn paging_fields(has_rows: bool, more: Option<&MoreFlag>) -> Result<&MoreFlag, String> {
    match (has_rows, more) {
        (true, Some(more)) => Ok(more),
        (false, _) => Err("response has no 'rows' array".to_string()),
        (true, None) => Err("response has no 'more' field".to_string()),
    }
}

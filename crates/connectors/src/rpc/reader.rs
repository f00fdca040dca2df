use crate::{
    error::RpcError,
    rpc::wire::{
        GET_TABLE_BY_SCOPE, GET_TABLE_ROWS, TableRowsRequest, TableRowsResponse,
        TableScopeRequest, TableScopeResponse,
    },
};
use async_trait::async_trait;
use reqwest::{Url, header::ACCEPT};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

/// Longest error body kept in [`RpcError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Read-only access to a node's table endpoints.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn get_table_rows(
        &self,
        request: &TableRowsRequest,
    ) -> Result<TableRowsResponse, RpcError>;

    async fn get_table_by_scope(
        &self,
        request: &TableScopeRequest,
    ) -> Result<TableScopeResponse, RpcError>;
}

/// [`ChainReader`] that POSTs JSON to a node over HTTP.
#[derive(Clone)]
pub struct HttpChainReader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChainReader {
    /// Builds a reader whose every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RpcError> {
        let base_url = normalize_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RpcError::from_reqwest(&base_url, err))?;

        Ok(HttpChainReader { client, base_url })
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, RpcError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let endpoint = format!("{}{}", self.base_url, path);
        let started = std::time::Instant::now();

        let response = self
            .client
            .post(&endpoint)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| RpcError::from_reqwest(&endpoint, err))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| RpcError::from_reqwest(&endpoint, err))?;

        debug!(
            "POST {} -> {} ({} bytes, {} ms)",
            endpoint,
            status,
            text.len(),
            started.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(RpcError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate(text, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&text).map_err(|source| RpcError::Decode { endpoint, source })
    }
}

#[async_trait]
impl ChainReader for HttpChainReader {
    async fn get_table_rows(
        &self,
        request: &TableRowsRequest,
    ) -> Result<TableRowsResponse, RpcError> {
        self.post(GET_TABLE_ROWS, request).await
    }

    async fn get_table_by_scope(
        &self,
        request: &TableScopeRequest,
    ) -> Result<TableScopeResponse, RpcError> {
        self.post(GET_TABLE_BY_SCOPE, request).await
    }
}

fn normalize_base_url(url: &str) -> Result<String, RpcError> {
    let invalid = || RpcError::InvalidUrl(url.to_string());
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn truncate(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push('…');
    }
    text
}

use crate::{
    error::RpcError,
    rpc::{reader::ChainReader, wire::TableRowsRequest},
};
use async_trait::async_trait;
use model::core::identifiers::TokenId;
use std::sync::Arc;

/// Per-account balance lookup used to enrich scanned account names.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// `Ok(None)` means the node answered but holds no usable balance for
    /// the account.
    async fn balance_of(&self, account: &str) -> Result<Option<String>, RpcError>;
}

/// Reads a holder's balance row from a standard token contract.
pub struct TokenBalances {
    reader: Arc<dyn ChainReader>,
    token: TokenId,
}

impl TokenBalances {
    const LOOKUP_LIMIT: u32 = 10;

    pub fn new(reader: Arc<dyn ChainReader>, token: TokenId) -> Self {
        TokenBalances { reader, token }
    }
}

#[async_trait]
impl BalanceSource for TokenBalances {
    async fn balance_of(&self, account: &str) -> Result<Option<String>, RpcError> {
        let request = TableRowsRequest::new(
            &self.token.balances_of(account),
            self.token.symbol.clone(),
            Self::LOOKUP_LIMIT,
        )
        .with_upper_bound(self.token.symbol.clone());

        let response = self.reader.get_table_rows(&request).await?;

        Ok(response
            .rows()
            .first()
            .and_then(|row| row.get_str("balance"))
            .map(str::to_string))
    }
}

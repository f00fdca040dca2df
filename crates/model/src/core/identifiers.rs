use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a contract table: the contract account that owns it, the
/// scope the rows are partitioned under and the table name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId {
    pub code: String,
    pub scope: String,
    pub table: String,
}

impl TableId {
    pub fn new(code: impl Into<String>, scope: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            scope: scope.into(),
            table: table.into(),
        }
    }

    /// A table whose rows live under the contract's own scope.
    pub fn self_scoped(code: impl Into<String>, table: impl Into<String>) -> Self {
        let code = code.into();
        Self::new(code.clone(), code, table)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.code, self.scope, self.table)
    }
}

/// A token contract and the symbol whose balances are looked up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenId {
    pub contract: String,
    pub table: String,
    pub symbol: String,
}

impl TokenId {
    pub fn new(contract: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            table: "accounts".to_string(),
            symbol: symbol.into(),
        }
    }

    /// The balance table of a single holder.
    pub fn balances_of(&self, account: &str) -> TableId {
        TableId::new(self.contract.clone(), account, self.table.clone())
    }
}

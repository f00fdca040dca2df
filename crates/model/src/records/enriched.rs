use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An account paired with the balance fetched for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub account: String,
    pub balance: String,
    pub date: DateTime<Utc>,
}

impl EnrichedRecord {
    pub fn new(account: impl Into<String>, balance: impl Into<String>) -> Self {
        Self::captured_at(account, balance, Utc::now())
    }

    pub fn captured_at(
        account: impl Into<String>,
        balance: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        EnrichedRecord {
            account: account.into(),
            balance: balance.into(),
            date,
        }
    }
}

/// Why a per-account lookup produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum LookupFailure {
    /// The node answered, but without a usable balance row.
    MissingBalance,

    /// The request itself failed.
    Transport(String),
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::MissingBalance => write!(f, "no balance row"),
            LookupFailure::Transport(msg) => write!(f, "request failed: {msg}"),
        }
    }
}

/// An account whose lookup failed, kept for the side error dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedLookup {
    pub account: String,
    pub reason: LookupFailure,
}

impl FailedLookup {
    pub fn missing_balance(account: impl Into<String>) -> Self {
        FailedLookup {
            account: account.into(),
            reason: LookupFailure::MissingBalance,
        }
    }

    pub fn transport(account: impl Into<String>, message: impl Into<String>) -> Self {
        FailedLookup {
            account: account.into(),
            reason: LookupFailure::Transport(message.into()),
        }
    }
}

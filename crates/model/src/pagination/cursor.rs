use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the pagination cursor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Numeric lower bound for a primary-key scan.
    PrimaryKey(u64),

    /// Scope name to resume a scope scan from. Empty means "first scope".
    Scope(String),
}

impl Cursor {
    /// Starting cursor for a primary-key scan.
    pub fn first_key() -> Self {
        Cursor::PrimaryKey(0)
    }

    /// Starting cursor for a scope scan.
    pub fn first_scope() -> Self {
        Cursor::Scope(String::new())
    }

    /// Renders the cursor as the `lower_bound` value sent on the wire.
    pub fn lower_bound(&self) -> String {
        match self {
            Cursor::PrimaryKey(key) => key.to_string(),
            Cursor::Scope(scope) => scope.clone(),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::PrimaryKey(key) => write!(f, "pk:{key}"),
            Cursor::Scope(scope) if scope.is_empty() => write!(f, "scope:<start>"),
            Cursor::Scope(scope) => write!(f, "scope:{scope}"),
        }
    }
}

/// Whether a scan has more pages after the current one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Resume from the given cursor.
    More(Cursor),

    /// The server reported no more data.
    Done,
}

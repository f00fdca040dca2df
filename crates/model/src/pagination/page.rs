use crate::{pagination::cursor::Continuation, records::row::Row};

/// One response worth of rows plus the server's continuation signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub rows: Vec<Row>,
    pub continuation: Continuation,
    pub took_ms: u128,
}

impl Page {
    pub fn new(rows: Vec<Row>, continuation: Continuation) -> Self {
        Page {
            rows,
            continuation,
            took_ms: 0,
        }
    }

    pub fn with_timing(mut self, took_ms: u128) -> Self {
        self.took_ms = took_ms;
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

use crate::records::row::Row;

/// Rows accumulated over every page of a scan, in page order.
///
/// The set only grows through [`ResultSet::append`], which consumes the
/// accumulator and returns the extended one, so a scan is a plain fold over
/// its pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
    pages: usize,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn append(mut self, page_rows: Vec<Row>) -> Self {
        self.rows.extend(page_rows);
        self.pages += 1;
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of pages folded into this set, including empty ones.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Collects a string field from every row that carries it.
    pub fn column(&self, field: &str) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get_str(field))
            .map(str::to_string)
            .collect()
    }
}

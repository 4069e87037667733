use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// One row of a [`ResultSet`](super::ResultSet).
///
/// Column names and the name-to-index map are shared by every row of the
/// result set they came from.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub(super) column_names: Arc<Vec<String>>,
    pub(super) column_index: Arc<HashMap<String, usize>>,
    pub(super) values: Vec<RowValues>,
}

impl ResultRow {
    /// Column names of this row, in select order.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// The values for this row, in select order.
    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index.get(column_name).copied()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use super::row::ResultRow;
use crate::error::MollerDbError;
use crate::types::RowValues;

/// A result set from a database query
///
/// Column names are stored once and shared with every row.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
    rows: Vec<ResultRow>,
}

impl ResultSet {
    /// Create an empty result set for the given columns.
    ///
    /// # Arguments
    ///
    /// * `column_names` - Column names in select order
    /// * `capacity` - The initial capacity for the result rows
    #[must_use]
    pub fn with_columns(column_names: Vec<String>, capacity: usize) -> ResultSet {
        let column_index = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<HashMap<_, _>>();
        ResultSet {
            column_names: Arc::new(column_names),
            column_index: Arc::new(column_index),
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append a row.
    ///
    /// # Errors
    /// Returns `MollerDbError::ExecutionError` if the row width does not match the column count.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) -> Result<(), MollerDbError> {
        if row_values.len() != self.column_names.len() {
            return Err(MollerDbError::ExecutionError(format!(
                "row has {} values but the result set has {} columns",
                row_values.len(),
                self.column_names.len()
            )));
        }
        self.rows.push(ResultRow {
            column_names: Arc::clone(&self.column_names),
            column_index: Arc::clone(&self.column_index),
            values: row_values,
        });
        Ok(())
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_lookup() {
        let mut rs = ResultSet::with_columns(vec!["run_number".into(), "value".into()], 2);
        rs.add_row_values(vec![RowValues::Int(5408), RowValues::Float(1.5)])
            .unwrap();
        rs.add_row_values(vec![RowValues::Int(5409), RowValues::Null])
            .unwrap();

        assert_eq!(rs.len(), 2);
        assert_eq!(rs.rows()[1].get("run_number"), Some(&RowValues::Int(5409)));
        assert_eq!(rs.rows()[0].get_by_index(1), Some(&RowValues::Float(1.5)));
        assert_eq!(rs.rows()[0].get("missing"), None);
        assert_eq!(rs.rows()[0].column_names(), rs.column_names());
    }

    #[test]
    fn rejects_rows_of_wrong_width() {
        let mut rs = ResultSet::with_columns(vec!["a".into()], 0);
        let err = rs
            .add_row_values(vec![RowValues::Int(1), RowValues::Int(2)])
            .unwrap_err();
        assert!(matches!(err, MollerDbError::ExecutionError(_)));
        assert!(rs.is_empty());
    }
}

//! Column-oriented tables built from row-oriented result sets.

use chrono::NaiveDateTime;
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::MollerDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Values of one column. `None` entries are SQL NULLs.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Bool(Vec<Option<bool>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
    Json(Vec<Option<JsonValue>>),
    Blob(Vec<Option<Vec<u8>>>),
    /// A column whose every cell is NULL; only the length is kept.
    Null(usize),
}

impl ColumnData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
            ColumnData::Json(v) => v.len(),
            ColumnData::Blob(v) => v.len(),
            ColumnData::Null(len) => *len,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Int(_) => "int",
            ColumnData::Float(_) => "float",
            ColumnData::Text(_) => "text",
            ColumnData::Bool(_) => "bool",
            ColumnData::Timestamp(_) => "timestamp",
            ColumnData::Json(_) => "json",
            ColumnData::Blob(_) => "blob",
            ColumnData::Null(_) => "null",
        }
    }

    #[must_use]
    pub fn null_count(&self) -> usize {
        fn nulls<T>(v: &[Option<T>]) -> usize {
            v.iter().filter(|cell| cell.is_none()).count()
        }
        match self {
            ColumnData::Int(v) => nulls(v),
            ColumnData::Float(v) => nulls(v),
            ColumnData::Text(v) => nulls(v),
            ColumnData::Bool(v) => nulls(v),
            ColumnData::Timestamp(v) => nulls(v),
            ColumnData::Json(v) => nulls(v),
            ColumnData::Blob(v) => nulls(v),
            ColumnData::Null(len) => *len,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&[Option<i64>]> {
        if let ColumnData::Int(v) = self {
            Some(v)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<&[Option<f64>]> {
        if let ColumnData::Float(v) = self {
            Some(v)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        if let ColumnData::Text(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl Serialize for ColumnData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ColumnData::Int(v) => v.serialize(serializer),
            ColumnData::Float(v) => v.serialize(serializer),
            ColumnData::Text(v) => v.serialize(serializer),
            ColumnData::Bool(v) => v.serialize(serializer),
            ColumnData::Timestamp(v) => v.serialize(serializer),
            ColumnData::Json(v) => v.serialize(serializer),
            ColumnData::Blob(v) => v.serialize(serializer),
            ColumnData::Null(len) => {
                let mut seq = serializer.serialize_seq(Some(*len))?;
                for _ in 0..*len {
                    seq.serialize_element(&Option::<()>::None)?;
                }
                seq.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Column", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", self.data.type_name())?;
        state.serialize_field("values", &self.data)?;
        state.end()
    }
}

/// A table stored column by column. Every column has `num_rows` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnarTable {
    num_rows: usize,
    columns: Vec<Column>,
}

const NULL_CELL: &RowValues = &RowValues::Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Int,
    Float,
    Text,
    Bool,
    Timestamp,
    Json,
    Blob,
}

impl Kind {
    fn of(value: &RowValues) -> Option<Kind> {
        match value {
            RowValues::Int(_) => Some(Kind::Int),
            RowValues::Float(_) => Some(Kind::Float),
            RowValues::Text(_) => Some(Kind::Text),
            RowValues::Bool(_) => Some(Kind::Bool),
            RowValues::Timestamp(_) => Some(Kind::Timestamp),
            RowValues::Json(_) => Some(Kind::Json),
            RowValues::Blob(_) => Some(Kind::Blob),
            RowValues::Null => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Text => "text",
            Kind::Bool => "bool",
            Kind::Timestamp => "timestamp",
            Kind::Json => "json",
            Kind::Blob => "blob",
        }
    }

    fn unify(self, other: Kind) -> Option<Kind> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (Kind::Int, Kind::Float) | (Kind::Float, Kind::Int) => Some(Kind::Float),
            _ => None,
        }
    }
}

impl ColumnarTable {
    /// Pivot a row-oriented result set into columns.
    ///
    /// The type of each column is taken from its non-null cells. Integers mixed
    /// with floats are widened to floats; a column with no non-null cells becomes
    /// [`ColumnData::Null`].
    ///
    /// # Errors
    /// Returns `MollerDbError::ConversionError` when a column mixes incompatible value kinds.
    pub fn from_result_set(result_set: &ResultSet) -> Result<Self, MollerDbError> {
        let num_rows = result_set.len();
        let mut columns = Vec::with_capacity(result_set.column_names().len());

        for (idx, name) in result_set.column_names().iter().enumerate() {
            let cells = result_set
                .rows()
                .iter()
                .map(|row| row.get_by_index(idx).unwrap_or(NULL_CELL));

            let mut kind: Option<Kind> = None;
            for cell in cells.clone() {
                let Some(cell_kind) = Kind::of(cell) else {
                    continue;
                };
                kind = match kind {
                    None => Some(cell_kind),
                    Some(current) => Some(current.unify(cell_kind).ok_or_else(|| {
                        MollerDbError::ConversionError(format!(
                            "column \"{name}\" mixes {} and {} values",
                            current.name(),
                            cell.kind()
                        ))
                    })?),
                };
            }

            let data = match kind {
                None => ColumnData::Null(num_rows),
                Some(Kind::Int) => ColumnData::Int(cells.map(RowValues::as_int).collect()),
                Some(Kind::Float) => ColumnData::Float(cells.map(RowValues::as_float).collect()),
                Some(Kind::Text) => ColumnData::Text(
                    cells.map(|c| c.as_text().map(str::to_string)).collect(),
                ),
                Some(Kind::Bool) => ColumnData::Bool(cells.map(RowValues::as_bool).collect()),
                Some(Kind::Timestamp) => {
                    ColumnData::Timestamp(cells.map(RowValues::as_timestamp).collect())
                }
                Some(Kind::Json) => ColumnData::Json(cells.map(|c| c.as_json().cloned()).collect()),
                Some(Kind::Blob) => {
                    ColumnData::Blob(cells.map(|c| c.as_blob().map(<[u8]>::to_vec)).collect())
                }
            };

            columns.push(Column {
                name: name.clone(),
                data,
            });
        }

        tracing::debug!(
            rows = num_rows,
            columns = columns.len(),
            "materialized columnar table"
        );
        Ok(ColumnarTable { num_rows, columns })
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.data)
    }
}

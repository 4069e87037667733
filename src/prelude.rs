//! Convenient imports for common functionality.

pub use crate::columnar::{Column, ColumnData, ColumnarTable};
pub use crate::conninfo::{ConnectionConfig, SslMode, parse_conninfo};
pub use crate::database::{Database, RunDataSource};
pub use crate::error::{MollerDbError, ParseError};
pub use crate::query::DetectorQuery;
pub use crate::results::{ResultRow, ResultSet};
pub use crate::types::RowValues;

#[cfg(feature = "postgres")]
pub use crate::postgres::PgPool;

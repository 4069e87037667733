//! Typed access to MOLLER detector run data.
//!
//! A libpq-style connection string is parsed into a [`ConnectionConfig`], turned
//! into a pooled `tokio-postgres` connection, and query results are materialized
//! as [`ColumnarTable`]s.
//!
//! ```rust,no_run
//! use mollerdb::prelude::*;
//!
//! # async fn demo() -> Result<(), MollerDbError> {
//! let db = Database::connect("host=localhost dbname=qwparity user=analyst password='s3cret pw'").await?;
//! let table = db.main_detector_results(5408, 5410, "mdallbars").await?;
//! println!("{} rows, columns {:?}", table.num_rows(), table.column_names());
//! # Ok(())
//! # }
//! ```

pub mod columnar;
pub mod conninfo;
pub mod database;
pub mod error;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod prelude;
pub mod query;
pub mod results;
#[cfg(feature = "test-utils")]
pub mod test_utils;
pub mod types;

pub use columnar::{Column, ColumnData, ColumnarTable};
pub use conninfo::{ConnectionConfig, SslMode, parse_conninfo};
pub use database::{Database, RunDataSource};
pub use error::{MollerDbError, ParseError};
pub use query::DetectorQuery;
pub use results::{ResultRow, ResultSet};
pub use types::RowValues;

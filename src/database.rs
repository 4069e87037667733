//! Connection string in, columnar tables out.

use async_trait::async_trait;

use crate::columnar::ColumnarTable;
use crate::conninfo::{ConnectionConfig, parse_conninfo};
use crate::error::MollerDbError;
use crate::query::DetectorQuery;
use crate::results::ResultSet;
use crate::types::RowValues;

#[cfg(feature = "postgres")]
use crate::postgres::{PgPool, execute_select};

/// Anything that can run a parameterized SELECT and hand back rows.
#[async_trait]
pub trait RunDataSource: Send + Sync {
    /// Run `sql` with positional `params`.
    ///
    /// # Errors
    /// Returns whatever the backend reports for preparation or execution failures.
    async fn select(&self, sql: &str, params: &[RowValues]) -> Result<ResultSet, MollerDbError>;
}

#[cfg(feature = "postgres")]
#[async_trait]
impl RunDataSource for PgPool {
    async fn select(&self, sql: &str, params: &[RowValues]) -> Result<ResultSet, MollerDbError> {
        let client = self.get_connection().await?;
        execute_select(&client, sql, params).await
    }
}

/// Handle on the run database.
pub struct Database {
    config: ConnectionConfig,
    source: Box<dyn RunDataSource>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Parse `conninfo`, build a pool and check that the server answers.
    ///
    /// # Errors
    /// Returns `MollerDbError::Parse` for a bad connection string,
    /// `MollerDbError::ConfigError` if the driver rejects the configuration, and
    /// `MollerDbError::ConnectionError` if no connection can be established.
    #[cfg(feature = "postgres")]
    pub async fn connect(conninfo: &str) -> Result<Self, MollerDbError> {
        let config = parse_conninfo(conninfo)?;
        let pool = PgPool::new(&config, PgPool::DEFAULT_MAX_SIZE)?;
        pool.get_connection().await.map_err(|e| {
            MollerDbError::ConnectionError(format!("Failed to connect to database: {e}"))
        })?;
        tracing::info!(dbname = ?config.dbname, "connected to run database");
        Ok(Self::with_source(config, pool))
    }

    /// Wrap an existing data source, e.g. a pool built elsewhere or a test double.
    #[must_use]
    pub fn with_source(config: ConnectionConfig, source: impl RunDataSource + 'static) -> Self {
        Database {
            config,
            source: Box::new(source),
        }
    }

    /// Parse `conninfo` without connecting and pair it with `source`.
    ///
    /// # Errors
    /// Returns `MollerDbError::Parse` for a bad connection string.
    pub fn from_conninfo(
        conninfo: &str,
        source: impl RunDataSource + 'static,
    ) -> Result<Self, MollerDbError> {
        Ok(Self::with_source(parse_conninfo(conninfo)?, source))
    }

    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Main-detector results for runs `start_run..=end_run` as a columnar table.
    ///
    /// # Errors
    /// Returns `MollerDbError::InvalidQuery` for a bad range or detector name, or any
    /// error raised while running the query or materializing columns.
    pub async fn main_detector_results(
        &self,
        start_run: i32,
        end_run: i32,
        detector: &str,
    ) -> Result<ColumnarTable, MollerDbError> {
        let query = DetectorQuery::new(start_run, end_run, detector)?;
        tracing::debug!(
            start_run,
            end_run,
            detector = query.detector(),
            "querying main detector results"
        );
        let result_set = self.source.select(query.sql(), &query.params()).await?;
        ColumnarTable::from_result_set(&result_set)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::columnar::ColumnData;

    #[derive(Default)]
    struct Recorded {
        calls: Mutex<Vec<(String, Vec<RowValues>)>>,
    }

    #[async_trait]
    impl RunDataSource for std::sync::Arc<Recorded> {
        async fn select(
            &self,
            sql: &str,
            params: &[RowValues],
        ) -> Result<ResultSet, MollerDbError> {
            self.calls
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            let mut rs = ResultSet::with_columns(
                vec!["run_number".into(), "value".into(), "error".into()],
                2,
            );
            rs.add_row_values(vec![
                RowValues::Int(5408),
                RowValues::Float(1.25),
                RowValues::Float(0.01),
            ])?;
            rs.add_row_values(vec![
                RowValues::Int(5409),
                RowValues::Float(1.5),
                RowValues::Null,
            ])?;
            Ok(rs)
        }
    }

    #[tokio::test]
    async fn main_detector_results_pivots_rows() {
        let source = std::sync::Arc::new(Recorded::default());
        let db = Database::from_conninfo("host=localhost dbname=moller", source.clone()).unwrap();

        let table = db.main_detector_results(5408, 5409, "mdallbars").await.unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("run_number"),
            Some(&ColumnData::Int(vec![Some(5408), Some(5409)]))
        );
        assert_eq!(
            table.column("error"),
            Some(&ColumnData::Float(vec![Some(0.01), None]))
        );

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            vec![
                RowValues::Int(5408),
                RowValues::Int(5409),
                RowValues::Text("mdallbars".into()),
            ]
        );
    }

    #[tokio::test]
    async fn invalid_query_never_reaches_source() {
        let source = std::sync::Arc::new(Recorded::default());
        let db = Database::from_conninfo("", source.clone()).unwrap();

        let err = db.main_detector_results(10, 1, "md1").await.unwrap_err();
        assert!(matches!(err, MollerDbError::InvalidQuery(_)));
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn bad_conninfo_is_a_parse_error() {
        let source = std::sync::Arc::new(Recorded::default());
        let err = Database::from_conninfo("port=notanumber", source).unwrap_err();
        assert!(matches!(err, MollerDbError::Parse(_)));
    }

    #[cfg(feature = "postgres")]
    #[tokio::test]
    async fn connect_fails_without_server() {
        // Port 1 on loopback is never a postgres server.
        let err = Database::connect("host=127.0.0.1 port=1 user=nobody dbname=none connect_timeout=2")
            .await
            .unwrap_err();
        assert!(matches!(err, MollerDbError::ConnectionError(_)));
    }

    #[cfg(feature = "postgres")]
    #[tokio::test]
    async fn connect_reports_parse_errors_first() {
        let err = Database::connect("host=localhost port=invalid").await.unwrap_err();
        assert!(matches!(
            err,
            MollerDbError::Parse(crate::ParseError::InvalidInteger { .. })
        ));
    }
}

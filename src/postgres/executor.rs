use tokio_postgres::Client;

use super::params::Params;
use super::query::build_result_set_from_statement;
use crate::error::MollerDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Execute a prepared SELECT query on a client without managing transactions.
///
/// # Errors
/// Returns errors from preparation, query execution, or result set building.
pub async fn execute_select(
    client: &Client,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, MollerDbError> {
    let stmt = client.prepare(query).await.map_err(|e| {
        MollerDbError::ExecutionError(format!("postgres prepare error: {e}"))
    })?;
    let converted = Params::convert(params);
    let rows = client
        .query(&stmt, converted.as_refs())
        .await
        .map_err(|e| MollerDbError::ExecutionError(format!("postgres select error: {e}")))?;
    tracing::debug!(rows = rows.len(), "postgres select returned");
    build_result_set_from_statement(&stmt, &rows)
}

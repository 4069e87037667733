use mollerdb::prelude::*;
use serde_json::Value;

pub(crate) const EXIT_DATABASE: u8 = 1;
pub(crate) const EXIT_USAGE: u8 = 2;

/// Parse `conninfo` and render it as pretty JSON.
pub(crate) fn parse(conninfo: &str) -> Result<String, MollerDbError> {
    let config = parse_conninfo(conninfo)?;
    tracing::debug!(?config, "parsed connection string");
    render(&config)
}

pub(crate) async fn detector_results(
    conninfo: &str,
    start_run: i32,
    end_run: i32,
    detector: &str,
) -> Result<String, MollerDbError> {
    let db = Database::connect(conninfo).await?;
    let table = db.main_detector_results(start_run, end_run, detector).await?;
    tracing::info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "fetched main detector results"
    );
    render(&table)
}

fn render<T: serde::Serialize>(value: &T) -> Result<String, MollerDbError> {
    let json: Value = serde_json::to_value(value)
        .map_err(|e| MollerDbError::ConversionError(format!("failed to encode JSON: {e}")))?;
    serde_json::to_string_pretty(&json)
        .map_err(|e| MollerDbError::ConversionError(format!("failed to encode JSON: {e}")))
}

/// Bad input the user can fix exits with 2, everything else with 1.
pub(crate) fn exit_code(err: &MollerDbError) -> u8 {
    match err {
        MollerDbError::Parse(_) | MollerDbError::InvalidQuery(_) | MollerDbError::ConfigError(_) => {
            EXIT_USAGE
        }
        _ => EXIT_DATABASE,
    }
}

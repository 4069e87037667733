// PostgreSQL connector
//
// - config: ConnectionConfig to driver config, pool setup
// - params: RowValues as bind parameters
// - query: driver rows to RowValues
// - executor: running SELECTs on a client

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{PgPool, connect_config, driver_ssl_mode};
pub use executor::execute_select;
pub use params::Params;
pub use query::{build_result_set_from_statement, postgres_extract_value};

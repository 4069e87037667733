use postgresql_embedded::PostgreSQL;

use super::{QWPARITY_FIXTURE_SQL, SHARED_RUNTIME};
use crate::conninfo::{ConnectionConfig, parse_conninfo};
use crate::postgres::PgPool;

/// Represents a running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    /// Connection string for the test database, in libpq key/value form
    pub conninfo: String,
    pub config: ConnectionConfig,
}

/// Set up an embedded `PostgreSQL` instance with an empty database named `dbname`.
///
/// # Errors
/// Returns an error if the embedded server cannot be set up or started, the database
/// cannot be created, or the post-start connectivity check fails.
pub fn setup_postgres_embedded(
    dbname: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(dbname).await?;

        let settings = postgresql.settings();
        let port = settings.port;
        let conninfo = format!(
            "host={} port={port} dbname={dbname} user={} password={} application_name=mollerdb-tests",
            settings.host,
            settings.username,
            quote(&settings.password),
        );
        let config = parse_conninfo(&conninfo)?;

        let pool = PgPool::new(&config, 1)?;
        let client = pool.get_connection().await?;
        client.batch_execute("SELECT 1").await?;
        println!("PostgreSQL started on port {port}");

        Ok(EmbeddedPostgres {
            postgresql,
            port,
            conninfo,
            config,
        })
    })
}

/// Create the QwParity tables and sample rows in the embedded database.
///
/// # Errors
/// Returns an error if the connection or any fixture statement fails.
pub fn load_qwparity_fixture(
    postgres: &EmbeddedPostgres,
) -> Result<(), Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let pool = PgPool::new(&postgres.config, 1)?;
        let client = pool.get_connection().await?;
        client.batch_execute(QWPARITY_FIXTURE_SQL).await?;
        Ok(())
    })
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        if let Err(error) = postgresql.stop().await {
            tracing::warn!(%error, "failed to stop embedded PostgreSQL; the server may still be running");
        }
    });
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}

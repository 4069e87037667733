use std::net::IpAddr;
use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use tokio_postgres::config::SslMode as PgSslMode;
use tokio_postgres::{Config as PgConfig, NoTls};

use crate::conninfo::{ConnectionConfig, SslMode};
use crate::error::MollerDbError;

fn default_user(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["PGUSER", "USER"]
        .into_iter()
        .filter_map(lookup)
        .find(|user| !user.is_empty())
}

/// Map a parsed connection string onto the `tokio-postgres` driver configuration.
///
/// # Errors
/// Without a `user` key the role comes from `PGUSER`, then `USER`, as with libpq.
///
/// # Errors
/// Returns `MollerDbError::ConfigError` if no user can be determined, `port` does not
/// fit in 16 bits, or `hostaddr` is not an IP address literal.
pub fn connect_config(config: &ConnectionConfig) -> Result<PgConfig, MollerDbError> {
    let mut pg = PgConfig::new();

    let user = match &config.user {
        Some(user) => user.clone(),
        None => default_user(|key| std::env::var(key).ok()).ok_or_else(|| {
            MollerDbError::ConfigError(
                "no user given and neither PGUSER nor USER is set".to_string(),
            )
        })?,
    };
    pg.user(&user);

    match (&config.host, &config.hostaddr) {
        (Some(host), _) => {
            pg.host(host);
        }
        (None, None) => {
            tracing::debug!("no host given, defaulting to localhost");
            pg.host("localhost");
        }
        (None, Some(_)) => {}
    }
    if let Some(hostaddr) = &config.hostaddr {
        let addr = hostaddr.parse::<IpAddr>().map_err(|e| {
            MollerDbError::ConfigError(format!("hostaddr {hostaddr:?} is not an IP address: {e}"))
        })?;
        pg.hostaddr(addr);
    }
    if let Some(port) = config.port {
        let port = u16::try_from(port).map_err(|_| {
            MollerDbError::ConfigError(format!("port {port} is out of range"))
        })?;
        pg.port(port);
    }
    if let Some(dbname) = &config.dbname {
        pg.dbname(dbname);
    }
    if let Some(password) = &config.password {
        pg.password(password);
    }
    if let Some(options) = &config.options {
        pg.options(options);
    }
    if let Some(application_name) = config.effective_application_name() {
        pg.application_name(application_name);
    }

    // libpq treats zero as "wait forever"
    if let Some(timeout) = config.connect_timeout.filter(|secs| *secs > 0) {
        pg.connect_timeout(Duration::from_secs(u64::from(timeout)));
    }
    if let Some(keepalives) = config.keepalives {
        pg.keepalives(keepalives);
    }
    if let Some(idle) = config.keepalives_idle {
        pg.keepalives_idle(Duration::from_secs(u64::from(idle)));
    }
    if let Some(interval) = config.keepalives_interval {
        pg.keepalives_interval(Duration::from_secs(u64::from(interval)));
    }
    if let Some(count) = config.keepalives_count {
        pg.keepalives_retries(count);
    }
    if let Some(mode) = config.sslmode {
        pg.ssl_mode(driver_ssl_mode(mode));
    }

    warn_unsupported(config);
    Ok(pg)
}

/// The driver only distinguishes disable / prefer / require.
#[must_use]
pub fn driver_ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Allow | SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require | SslMode::VerifyCa | SslMode::VerifyFull => PgSslMode::Require,
    }
}

fn warn_unsupported(config: &ConnectionConfig) {
    if let Some(encoding) = &config.client_encoding
        && !encoding.eq_ignore_ascii_case("utf8")
        && !encoding.eq_ignore_ascii_case("utf-8")
    {
        tracing::warn!(
            client_encoding = %encoding,
            "the postgres driver always uses UTF8; ignoring client_encoding"
        );
    }

    let ignored = [
        ("sslcompression", config.sslcompression.is_some()),
        ("sslcert", config.sslcert.is_some()),
        ("sslkey", config.sslkey.is_some()),
        ("sslrootcert", config.sslrootcert.is_some()),
        ("sslcrl", config.sslcrl.is_some()),
        ("requirepeer", config.requirepeer.is_some()),
        ("krbsrvname", config.krbsrvname.is_some()),
        ("service", config.service.is_some()),
    ];
    for (key, _) in ignored.iter().filter(|(_, set)| *set) {
        tracing::warn!(key, "connection option is not supported by the postgres driver; ignoring");
    }
}

/// Pooled Postgres connections built from a [`ConnectionConfig`].
#[derive(Clone, Debug)]
pub struct PgPool {
    pool: Pool,
}

impl PgPool {
    pub const DEFAULT_MAX_SIZE: usize = 4;

    /// Build a pool. No connection is opened until one is requested.
    ///
    /// # Errors
    /// Returns `MollerDbError::ConfigError` from [`connect_config`] or
    /// `MollerDbError::ConnectionError` if pool creation fails.
    pub fn new(config: &ConnectionConfig, max_size: usize) -> Result<Self, MollerDbError> {
        let pg_config = connect_config(config)?;
        let mut manager_config = ManagerConfig::default();
        manager_config.recycling_method = RecyclingMethod::Fast;
        let manager = Manager::from_config(pg_config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(max_size.max(1))
            .build()
            .map_err(|e| {
                MollerDbError::ConnectionError(format!("Failed to create Postgres pool: {e}"))
            })?;

        tracing::info!(
            host = config.host.as_deref().unwrap_or("localhost"),
            dbname = config.dbname.as_deref().unwrap_or_default(),
            max_size = max_size.max(1),
            "created postgres pool"
        );
        Ok(PgPool { pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// Returns `MollerDbError::PoolError` if no connection can be established.
    pub async fn get_connection(&self) -> Result<Object, MollerDbError> {
        Ok(self.pool.get().await?)
    }
}

use thiserror::Error;

#[cfg(feature = "postgres")]
use deadpool_postgres::PoolError;

/// Errors raised while turning a connection string into a [`ConnectionConfig`].
///
/// [`ConnectionConfig`]: crate::conninfo::ConnectionConfig
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid boolean value for '{key}': {value:?} (expected one of 1/true/on/yes or 0/false/off/no)")]
    InvalidBoolean { key: String, value: String },

    #[error("invalid integer value for '{key}': {value:?} (expected a non-negative integer)")]
    InvalidInteger { key: String, value: String },

    #[error("malformed connection string: {reason}")]
    MalformedConnectionString { reason: String },
}

#[derive(Debug, Error)]
pub enum MollerDbError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolError(#[from] PoolError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Column conversion error: {0}")]
    ConversionError(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_name_key_and_value() {
        let err = ParseError::InvalidInteger {
            key: "port".into(),
            value: "notanumber".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'port'"));
        assert!(msg.contains("\"notanumber\""));
    }

    #[test]
    fn parse_error_converts_into_crate_error() {
        let err: MollerDbError = ParseError::MalformedConnectionString {
            reason: "unterminated quoted value".into(),
        }
        .into();
        assert!(matches!(err, MollerDbError::Parse(_)));
        assert_eq!(
            err.to_string(),
            "malformed connection string: unterminated quoted value"
        );
    }
}

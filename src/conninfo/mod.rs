//! libpq-style `key=value` connection strings.
//!
//! ```rust
//! use mollerdb::conninfo::{SslMode, parse_conninfo};
//!
//! let config = parse_conninfo("host=localhost port=5432 password='my pass' sslmode=verify-full")?;
//! assert_eq!(config.host.as_deref(), Some("localhost"));
//! assert_eq!(config.port, Some(5432));
//! assert_eq!(config.password.as_deref(), Some("my pass"));
//! assert_eq!(config.sslmode, Some(SslMode::VerifyFull));
//! # Ok::<(), mollerdb::ParseError>(())
//! ```

use std::borrow::Cow;
use std::str::FromStr;

mod config;
mod scanner;
mod sslmode;

pub use config::ConnectionConfig;
pub use sslmode::{SslMode, UnknownSslMode};

use crate::error::ParseError;
use scanner::{scan_key, scan_quoted, scan_unquoted, skip_whitespace};

/// Parse a connection string into a [`ConnectionConfig`].
///
/// Pairs are read left to right. A token without `=`, an empty key, or an
/// unterminated quoted value fails the whole parse, as does a bad boolean or
/// integer value for a known key. A `key=` with nothing after it ends the
/// string and leaves that field unset.
///
/// # Errors
/// Returns [`ParseError::MalformedConnectionString`] for syntax errors and
/// [`ParseError::InvalidBoolean`] / [`ParseError::InvalidInteger`] for values
/// that do not coerce.
pub fn parse_conninfo(input: &str) -> Result<ConnectionConfig, ParseError> {
    let bytes = input.as_bytes();
    let mut config = ConnectionConfig::default();
    let mut idx = skip_whitespace(bytes, 0);

    while idx < bytes.len() {
        let key_end = scan_key(bytes, idx);
        let key = &input[idx..key_end];
        let eq = skip_whitespace(bytes, key_end);

        if key.is_empty() {
            return Err(malformed(format!("missing key before \"=\" at offset {idx}")));
        }
        if bytes.get(eq) != Some(&b'=') {
            return Err(malformed(format!(
                "missing \"=\" after \"{key}\" at offset {key_end}"
            )));
        }

        let value_start = skip_whitespace(bytes, eq + 1);
        if value_start == bytes.len() {
            tracing::debug!(key, "no value after \"=\" at end of input, leaving field unset");
            break;
        }
        let (value, value_end): (Cow<'_, str>, usize) = if bytes.get(value_start) == Some(&b'\'')
        {
            let (decoded, end) = scan_quoted(input, value_start).ok_or_else(|| {
                malformed(format!(
                    "unterminated quoted value for \"{key}\" starting at offset {value_start}"
                ))
            })?;
            (Cow::Owned(decoded), end)
        } else {
            let end = scan_unquoted(bytes, value_start);
            (Cow::Borrowed(&input[value_start..end]), end)
        };

        config.apply(key, &value)?;
        idx = skip_whitespace(bytes, value_end);
    }

    Ok(config)
}

fn malformed(reason: String) -> ParseError {
    ParseError::MalformedConnectionString { reason }
}

impl FromStr for ConnectionConfig {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_conninfo(s)
    }
}

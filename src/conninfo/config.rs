use std::fmt;

use serde::Serialize;

use super::sslmode::SslMode;
use crate::error::ParseError;

/// Structured form of a libpq key/value connection string.
///
/// Every field is optional; `None` means the key did not appear (or, for
/// `sslmode`, appeared with a value that is not a known mode).
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostaddr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dbname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_application_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keepalives: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keepalives_idle: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keepalives_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keepalives_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sslmode: Option<SslMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sslcompression: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sslcert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sslkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sslrootcert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sslcrl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirepeer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub krbsrvname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ConnectionConfig {
    /// Assign one parsed `key=value` pair.
    ///
    /// Booleans and integers are strict, `sslmode` and unknown keys are lenient.
    /// A repeated key overwrites the earlier value.
    pub(super) fn apply(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        let text = || Some(value.to_string());
        match key {
            "host" => self.host = text(),
            "hostaddr" => self.hostaddr = text(),
            "port" => self.port = Some(parse_uint(key, value)?),
            "dbname" => self.dbname = text(),
            "user" => self.user = text(),
            "password" => self.password = text(),
            "connect_timeout" => self.connect_timeout = Some(parse_uint(key, value)?),
            "client_encoding" => self.client_encoding = text(),
            "options" => self.options = text(),
            "application_name" => self.application_name = text(),
            "fallback_application_name" => self.fallback_application_name = text(),
            "keepalives" => self.keepalives = Some(parse_bool(key, value)?),
            "keepalives_idle" => self.keepalives_idle = Some(parse_uint(key, value)?),
            "keepalives_interval" => self.keepalives_interval = Some(parse_uint(key, value)?),
            "keepalives_count" => self.keepalives_count = Some(parse_uint(key, value)?),
            "sslmode" => match SslMode::from_conninfo(value) {
                Some(mode) => self.sslmode = Some(mode),
                None => tracing::debug!(value, "ignoring unrecognized sslmode"),
            },
            "sslcompression" => self.sslcompression = Some(parse_bool(key, value)?),
            "sslcert" => self.sslcert = text(),
            "sslkey" => self.sslkey = text(),
            "sslrootcert" => self.sslrootcert = text(),
            "sslcrl" => self.sslcrl = text(),
            "requirepeer" => self.requirepeer = text(),
            "krbsrvname" => self.krbsrvname = text(),
            "service" => self.service = text(),
            _ => tracing::debug!(key, "ignoring unrecognized connection option"),
        }
        Ok(())
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == ConnectionConfig::default()
    }

    /// `application_name`, or `fallback_application_name` when the former is unset.
    #[must_use]
    pub fn effective_application_name(&self) -> Option<&str> {
        self.application_name
            .as_deref()
            .or(self.fallback_application_name.as_deref())
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("hostaddr", &self.hostaddr)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connect_timeout", &self.connect_timeout)
            .field("client_encoding", &self.client_encoding)
            .field("options", &self.options)
            .field("application_name", &self.application_name)
            .field("fallback_application_name", &self.fallback_application_name)
            .field("keepalives", &self.keepalives)
            .field("keepalives_idle", &self.keepalives_idle)
            .field("keepalives_interval", &self.keepalives_interval)
            .field("keepalives_count", &self.keepalives_count)
            .field("sslmode", &self.sslmode)
            .field("sslcompression", &self.sslcompression)
            .field("sslcert", &self.sslcert)
            .field("sslkey", &self.sslkey)
            .field("sslrootcert", &self.sslrootcert)
            .field("sslcrl", &self.sslcrl)
            .field("requirepeer", &self.requirepeer)
            .field("krbsrvname", &self.krbsrvname)
            .field("service", &self.service)
            .finish()
    }
}

/// Case-insensitive libpq boolean vocabulary.
pub(super) fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    const TRUE_WORDS: [&str; 4] = ["1", "true", "on", "yes"];
    const FALSE_WORDS: [&str; 4] = ["0", "false", "off", "no"];

    if TRUE_WORDS.iter().any(|w| value.eq_ignore_ascii_case(w)) {
        Ok(true)
    } else if FALSE_WORDS.iter().any(|w| value.eq_ignore_ascii_case(w)) {
        Ok(false)
    } else {
        Err(ParseError::InvalidBoolean {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Digits only: no sign, no surrounding whitespace, must fit in `u32`.
pub(super) fn parse_uint(key: &str, value: &str) -> Result<u32, ParseError> {
    let invalid = || ParseError::InvalidInteger {
        key: key.to_string(),
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse::<u32>().map_err(|_| invalid())
}

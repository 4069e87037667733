use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

/// Transport encryption policy, spelled the way libpq spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    /// Never use TLS.
    Disable,
    /// Try plaintext first, fall back to TLS.
    Allow,
    /// Try TLS first, fall back to plaintext.
    Prefer,
    /// Require TLS without verifying the server certificate.
    Require,
    /// Require TLS and verify the certificate chain.
    VerifyCa,
    /// Require TLS, verify the chain and the host name.
    VerifyFull,
}

impl SslMode {
    pub const ALL: [SslMode; 6] = [
        SslMode::Disable,
        SslMode::Allow,
        SslMode::Prefer,
        SslMode::Require,
        SslMode::VerifyCa,
        SslMode::VerifyFull,
    ];

    /// libpq keyword for this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }

    /// Exact, case-sensitive lookup of a libpq mode keyword.
    #[must_use]
    pub fn from_conninfo(value: &str) -> Option<SslMode> {
        SslMode::ALL.into_iter().find(|mode| mode.as_str() == value)
    }

    /// Whether a connection in this mode can proceed without TLS.
    #[must_use]
    pub fn allows_plaintext(self) -> bool {
        matches!(self, SslMode::Disable | SslMode::Allow | SslMode::Prefer)
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sslmode {0:?}")]
pub struct UnknownSslMode(pub String);

impl FromStr for SslMode {
    type Err = UnknownSslMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SslMode::from_conninfo(s).ok_or_else(|| UnknownSslMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_display() {
        for mode in SslMode::ALL {
            assert_eq!(mode.to_string().parse::<SslMode>(), Ok(mode));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(SslMode::from_conninfo("verify-full"), Some(SslMode::VerifyFull));
        assert_eq!(SslMode::from_conninfo("Require"), None);
        assert_eq!(SslMode::from_conninfo("verify_full"), None);
    }

    #[test]
    fn serializes_with_libpq_spelling() {
        let json = serde_json::to_string(&SslMode::VerifyCa).unwrap();
        assert_eq!(json, "\"verify-ca\"");
    }

    #[test]
    fn clap_value_names_match_keywords() {
        for mode in SslMode::ALL {
            let value = mode.to_possible_value().unwrap();
            assert_eq!(value.get_name(), mode.as_str());
        }
    }
}

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect MOLLER run-database connection strings and query results")]
pub(crate) struct Args {
    /// libpq key/value connection string
    #[arg(long, env = "MOLLERDB_CONNINFO", hide_env_values = true)]
    pub(crate) conninfo: Option<String>,
    /// File holding the connection string; `#` lines are comments
    #[arg(long)]
    pub(crate) conninfo_file: Option<PathBuf>,
    /// Also write log output to this file
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    /// trace, debug, info, warn or error
    #[arg(long, default_value = "info", env = "MOLLERDB_LOG_LEVEL")]
    pub(crate) log_level: String,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Parse the connection string and print it as JSON (password omitted)
    Parse,
    /// Query main detector results and print them as columnar JSON
    DetectorResults {
        #[arg(long)]
        start_run: i32,
        #[arg(long)]
        end_run: i32,
        #[arg(long)]
        detector: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConninfoSourceError {
    #[error("no connection string: pass --conninfo, set MOLLERDB_CONNINFO, or pass --conninfo-file")]
    Missing,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Args {
    /// `--conninfo` (or its env var) wins over `--conninfo-file`.
    pub(crate) fn resolve_conninfo(&self) -> Result<String, ConninfoSourceError> {
        if let Some(conninfo) = &self.conninfo {
            return Ok(conninfo.clone());
        }
        let path = self
            .conninfo_file
            .as_ref()
            .ok_or(ConninfoSourceError::Missing)?;
        let contents = fs::read_to_string(path).map_err(|source| ConninfoSourceError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(strip_comments(&contents))
    }
}

fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ")
}

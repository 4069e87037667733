use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriter;

/// Writes log lines to stderr and, when configured, to a file.
///
/// Stdout is left for command output so it can be piped.
#[derive(Clone)]
pub(crate) struct LogWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl LogWriter {
    pub(crate) fn new(path: Option<PathBuf>) -> io::Result<Self> {
        let file = match path {
            Some(path) => Some(Arc::new(Mutex::new(File::create(path)?))),
            None => None,
        };
        Ok(Self { file })
    }
}

pub(crate) struct LogWriterGuard {
    file: Option<Arc<Mutex<File>>>,
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriterGuard {
            file: self.file.clone(),
        }
    }
}

impl Write for LogWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = &self.file {
            let mut handle = file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?;
            handle.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = &self.file {
            let mut handle = file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?;
            handle.flush()?;
        }
        Ok(())
    }
}

/// Install the global fmt subscriber. `RUST_LOG` overrides `level` when set.
pub(crate) fn init(level: &str, writer: LogWriter) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn mirrors_writes_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mollerdb.log");
        let writer = LogWriter::new(Some(path.clone())).unwrap();

        let mut guard = writer.make_writer();
        guard.write_all(b"connected\n").unwrap();
        guard.flush().unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "connected\n");
    }

    #[test]
    fn missing_directory_fails_early() {
        let result = LogWriter::new(Some(PathBuf::from("/nonexistent/dir/mollerdb.log")));
        assert!(result.is_err());
    }
}

//! Log sink for applications using the client: every record goes both to a log
//! file and to stderr.

use crate::error::AemetError;
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

pub const DEFAULT_LOG_FILE: &str = "aemet_client.log";

/// Installs a global `env_logger` writing `timestamp - target - LEVEL - message`
/// lines to `log_file` (appended) and stderr.
///
/// The filter defaults to `debug`, so request and response dumps are included;
/// `RUST_LOG` overrides it.
///
/// # Errors
///
/// [`AemetError::LogFile`] if the file cannot be opened, [`AemetError::LoggerInit`]
/// if a logger is already installed.
pub fn init_logging(log_file: impl AsRef<Path>) -> Result<(), AemetError> {
    let path = log_file.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AemetError::LogFile(path.to_path_buf(), e))?;

    Builder::from_env(Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                buf.timestamp_millis(),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter::new(file, io::stderr()))))
        .try_init()?;
    Ok(())
}

/// Writes everything to two sinks.
pub(crate) struct TeeWriter<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

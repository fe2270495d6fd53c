use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

use super::{RegistryError, RegistryResult};

/// Route tracing events to the run's `logs.ndjson`.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_run_logging(path: &Path, level: &str) -> RegistryResult<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let file = Arc::new(Mutex::new(file));

    let make_writer = BoxMakeWriter::new(move || RunLogWriter {
        file: Arc::clone(&file),
    });

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| RegistryError::Logging(err.to_string()))?;

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(make_writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| RegistryError::Logging(err.to_string()))?;

    Ok(())
}

struct RunLogWriter {
    file: Arc<Mutex<File>>,
}

impl RunLogWriter {
    fn with_file<T>(&self, op: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("run log lock poisoned"))?;
        op(&mut file)
    }
}

impl Write for RunLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

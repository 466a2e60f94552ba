//! Write targets for serialized records.
//!
//! A sink receives one complete, newline-terminated record per call and must
//! write it without interleaving with records written concurrently.

use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for serialized records.
#[cfg_attr(test, mockall::automock)]
pub trait Sink: Send + Sync {
    /// Write one newline-terminated record.
    fn write_record(&self, record: &[u8]) -> io::Result<()>;
}

/// Process standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(record)?;
        out.flush()
    }
}

/// Process standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(record)?;
        err.flush()
    }
}

/// Any `io::Write`, serialized behind a mutex.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

/// Append-mode log file.
pub type FileSink = WriterSink<File>;

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WriterSink<File> {
    /// Open `path` for appending, creating it if needed.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut writer = self.lock();
        writer.write_all(record)?;
        writer.flush()
    }
}

/// In-memory sink that keeps every record, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle, ready to hand to a logger.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Raw lines written so far, without their trailing newline.
    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Lines written so far, parsed as JSON.
    ///
    /// Lines that are not valid JSON come back as strings.
    pub fn records(&self) -> Vec<Value> {
        self.lock()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap_or_else(|_| Value::String(line.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sink for MemorySink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let text = std::str::from_utf8(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.lock().push(text.trim_end_matches('\n').to_string());
        Ok(())
    }
}

//! Storage hand-off for normalized claims.

use std::io::Write;

use claims_model::ClaimRecord;

use crate::error::{IngestError, Result};

/// Destination for normalized claims.
///
/// The orchestrator calls [`store`](ClaimSink::store) once per batch or
/// chunk and [`finish`](ClaimSink::finish) after the last one.
pub trait ClaimSink {
    /// Stores a batch, returning the number of records accepted.
    fn store(&mut self, records: &[ClaimRecord]) -> Result<usize>;

    /// Flushes buffered output.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps every stored claim in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<ClaimRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ClaimSink for MemorySink {
    fn store(&mut self, records: &[ClaimRecord]) -> Result<usize> {
        self.records.extend_from_slice(records);
        Ok(records.len())
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ClaimSink for JsonLinesSink<W> {
    fn store(&mut self, records: &[ClaimRecord]) -> Result<usize> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)
                .map_err(|e| IngestError::Sink { source: e.into() })?;
            self.writer
                .write_all(b"\n")
                .map_err(|source| IngestError::Sink { source })?;
        }
        self.written += records.len();
        Ok(records.len())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|source| IngestError::Sink { source })
    }
}

impl<S: ClaimSink + ?Sized> ClaimSink for &mut S {
    fn store(&mut self, records: &[ClaimRecord]) -> Result<usize> {
        (**self).store(records)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

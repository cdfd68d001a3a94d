use doc_gen::ObjectSchema;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;
pub const DOC_FLUSH_COUNT: usize = 100;

/// Totals for a finished dataset file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub documents: u64,
    pub bytes: u64,
}

/// Newline-delimited JSON writer: one compact document per line.
pub struct NdjsonWriter<W: Write> {
    writer: BufWriter<W>,
    write_count: usize,
    stats: WriteStats,
}

impl NdjsonWriter<File> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> NdjsonWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, inner),
            write_count: 0,
            stats: WriteStats::default(),
        }
    }

    pub fn write_document(&mut self, doc: &Value) -> io::Result<()> {
        let line = serde_json::to_vec(doc)?;
        self.writer.write_all(&line)?;
        self.writer.write_all(b"\n")?;

        self.stats.documents += 1;
        self.stats.bytes += line.len() as u64 + 1;

        self.write_count += 1;
        if self.write_count >= DOC_FLUSH_COUNT {
            self.write_count = 0;
            self.writer.flush()?;
        }

        Ok(())
    }

    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Flush everything and return the totals.
    pub fn finish(mut self) -> io::Result<WriteStats> {
        self.writer.flush()?;
        Ok(self.stats)
    }
}

/// Write `schema` as compact JSON, the form the external CLI reads.
pub fn write_schema(path: &Path, schema: &ObjectSchema) -> io::Result<()> {
    fs::write(path, schema.to_json_string())
}

/// Totals for an existing NDJSON file; blank lines are not documents.
pub fn scan_dataset(path: &Path) -> io::Result<WriteStats> {
    let file = File::open(path)?;
    let bytes = file.metadata()?.len();

    let mut documents = 0;
    for line in BufReader::new(file).lines() {
        if !line?.trim().is_empty() {
            documents += 1;
        }
    }

    Ok(WriteStats { documents, bytes })
}

use std::io::Write;

use crate::error::Result;

/// Default number of bases per sequence line
pub const DEFAULT_LINE_WIDTH: usize = 50;

/// Writes sequences as FASTA text
///
/// Each record is written as `>` + key, a newline, the sequence wrapped at the
/// configured line width with lines joined by newlines, and a final newline.
pub struct FastaWriter<W: Write> {
    /// Inner writer
    inner: W,

    /// Number of bases per line (0 disables wrapping)
    line_width: usize,

    /// Number of records written
    records_written: usize,
}
impl<W: Write> FastaWriter<W> {
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            line_width: DEFAULT_LINE_WIDTH,
            records_written: 0,
        }
    }

    /// Write a single record
    ///
    /// Returns `Ok(true)` if the record was written and `Ok(false)` if it was skipped
    /// because its sequence is empty.
    pub fn write_record(&mut self, key: &str, sequence: &str) -> Result<bool> {
        if sequence.is_empty() {
            log::debug!("skipping '{key}': empty sequence");
            return Ok(false);
        }

        self.inner.write_all(b">")?;
        self.inner.write_all(key.as_bytes())?;
        self.inner.write_all(b"\n")?;

        let bytes = sequence.as_bytes();
        let width = if self.line_width == 0 {
            bytes.len()
        } else {
            self.line_width
        };
        for (i, line) in bytes.chunks(width).enumerate() {
            if i > 0 {
                self.inner.write_all(b"\n")?;
            }
            self.inner.write_all(line)?;
        }
        self.inner.write_all(b"\n")?;

        self.records_written += 1;
        Ok(true)
    }

    /// Write every `(key, sequence)` pair in iteration order
    ///
    /// Returns the number of records written.
    pub fn write_all<I, K, S>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        let mut n = 0;
        for (key, sequence) in records {
            if self.write_record(key.as_ref(), sequence.as_ref())? {
                n += 1;
            }
        }
        Ok(n)
    }

    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Builder for creating configured `FastaWriter` instances
///
/// # Examples
///
/// ```
/// # use seqmap::{FastaWriterBuilder, Result};
/// # fn main() -> Result<()> {
/// let mut writer = FastaWriterBuilder::default()
///     .line_width(4)
///     .build(Vec::new());
/// writer.write_record("seq1", "ACGTACGTAC")?;
/// assert_eq!(writer.into_inner(), b">seq1\nACGT\nACGT\nAC\n");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct FastaWriterBuilder {
    /// Optional line width, defaults to [`DEFAULT_LINE_WIDTH`]
    line_width: Option<usize>,
}
impl FastaWriterBuilder {
    #[must_use]
    pub fn line_width(mut self, line_width: usize) -> Self {
        self.line_width = Some(line_width);
        self
    }

    pub fn build<W: Write>(self, inner: W) -> FastaWriter<W> {
        let mut writer = FastaWriter::new(inner);
        if let Some(line_width) = self.line_width {
            writer.line_width = line_width;
        }
        writer
    }
}

/// Serializes `(key, sequence)` pairs to a FASTA string
pub fn encode_fasta<I, K, S>(records: I, line_width: usize) -> Result<String>
where
    I: IntoIterator<Item = (K, S)>,
    K: AsRef<str>,
    S: AsRef<str>,
{
    let mut writer = FastaWriterBuilder::default()
        .line_width(line_width)
        .build(Vec::new());
    writer.write_all(records)?;
    let text = String::from_utf8(writer.into_inner()).map_err(|e| e.utf8_error())?;
    Ok(text)
}

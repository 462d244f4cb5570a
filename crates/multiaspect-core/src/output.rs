//! Serialization of bucket indexes and per-image records.
//!
//! JSON output is the whole index as one object; JSON Lines output is one
//! [`AssignmentRecord`] per image, including skipped ones.

use serde::Serialize;
use std::io::{self, Write};

use crate::bucket::BucketIndex;
use crate::types::AssignmentRecord;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Bucket index as a single JSON object
    Json,
    /// One assignment record per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Writes bucket indexes or assignment records to any `Write`.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a full index.
    ///
    /// In JSON Lines mode each bucket becomes one `{"bucket", "paths"}` line.
    pub fn write_index(&mut self, index: &BucketIndex) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(index),
            OutputFormat::JsonLines => {
                #[derive(Serialize)]
                struct BucketLine<'a> {
                    bucket: &'a str,
                    paths: &'a [String],
                }
                for (bucket, paths) in index.iter() {
                    self.write_line(&BucketLine { bucket, paths })?;
                }
                Ok(())
            }
        }
    }

    /// Write one assignment record as a line.
    pub fn write_record(&mut self, record: &AssignmentRecord) -> io::Result<()> {
        self.write_line(record)
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    fn write_line<T: Serialize + ?Sized>(&mut self, item: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    /// Number of top-level JSON values written.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    fn sample_index() -> BucketIndex {
        let mut index = BucketIndex::new();
        index.insert("1.5", "a.jpg");
        index.insert("1.5", "b.jpg");
        index.insert("0.75", "c.jpg");
        index
    }

    #[test]
    fn test_write_index_json() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write_index(&sample_index()).unwrap();
        assert_eq!(writer.items_written(), 1);

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "{\"0.75\":[\"c.jpg\"],\"1.5\":[\"a.jpg\",\"b.jpg\"]}\n"
        );
    }

    #[test]
    fn test_write_index_json_pretty_parses_back() {
        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, OutputFormat::Json, true)
            .write_index(&sample_index())
            .unwrap();

        let parsed: BucketIndex = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, sample_index());
    }

    #[test]
    fn test_write_index_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true);
        writer.write_index(&sample_index()).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"bucket":"0.75","paths":["c.jpg"]}"#);
    }

    #[test]
    fn test_write_records() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::JsonLines, false);
        writer
            .write_record(&AssignmentRecord::Bucketed {
                path: "a.jpg".into(),
                bucket: "1.5".into(),
            })
            .unwrap();
        writer
            .write_record(&AssignmentRecord::Skipped {
                path: "b.jpg".into(),
                kind: FailureKind::Retrieval,
                error: "Not found: b.jpg".into(),
            })
            .unwrap();

        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains(r#""kind":"retrieval""#));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("jsonl"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("NDJSON"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("invalid"), None);
    }
}

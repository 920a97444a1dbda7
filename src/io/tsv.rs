//! Tab-separated synapse tables.
//!
//! The synapse table has one row per detected object per slice, with the
//! columns of [`SynapseRecord`]:
//! `synapse_id`, `x_px`, `y_px`, `z_px`, `size_px`, `detection_uncertainty`,
//! `node_id`, `node_x_px`, `node_y_px`, `node_z_px`.
//!
//! Fields are separated by tabs, lines end in `\n`, and the first line is
//! always a header, even when no synapse was found. The merged table written
//! by [`write_merged_table`] has the same columns plus `node_count`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SynaptrackError;
use crate::merge::MergedSynapse;
use crate::model::SynapseRecord;
use crate::pipeline::RecordSink;

/// Column names of the synapse table, in order.
pub const SYNAPSE_COLUMNS: [&str; 10] = [
    "synapse_id",
    "x_px",
    "y_px",
    "z_px",
    "size_px",
    "detection_uncertainty",
    "node_id",
    "node_x_px",
    "node_y_px",
    "node_z_px",
];

/// Column names of the merged synapse table, in order.
pub const MERGED_COLUMNS: [&str; 11] = [
    "synapse_id",
    "x_px",
    "y_px",
    "z_px",
    "size_px",
    "detection_uncertainty",
    "node_id",
    "node_x_px",
    "node_y_px",
    "node_z_px",
    "node_count",
];

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false);
    builder
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.delimiter(b'\t').has_headers(true);
    builder
}

/// Streams synapse records to a tab-separated table, one node at a time.
///
/// The header is written on construction and every [`RecordSink::append`]
/// flushes, so a partially processed skeleton still leaves a readable table
/// behind.
pub struct SynapseTableWriter<W: Write> {
    writer: csv::Writer<W>,
    path: PathBuf,
}

impl SynapseTableWriter<BufWriter<File>> {
    /// Creates (or truncates) the table at `path`.
    pub fn create(path: &Path) -> Result<Self, SynaptrackError> {
        let file = File::create(path).map_err(SynaptrackError::Io)?;
        Self::new(BufWriter::new(file), path)
    }
}

impl<W: Write> SynapseTableWriter<W> {
    /// Wraps `inner`, writing the header immediately. `path` is only used in
    /// error messages.
    pub fn new(inner: W, path: &Path) -> Result<Self, SynaptrackError> {
        let mut writer = writer_builder().from_writer(inner);
        writer
            .write_record(SYNAPSE_COLUMNS)
            .map_err(|source| SynaptrackError::TsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, SynaptrackError> {
        self.writer
            .into_inner()
            .map_err(|e| SynaptrackError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for SynapseTableWriter<W> {
    fn append(&mut self, records: &[SynapseRecord]) -> Result<(), SynaptrackError> {
        for record in records {
            self.writer
                .serialize(record)
                .map_err(|source| SynaptrackError::TsvWrite {
                    path: self.path.clone(),
                    source,
                })?;
        }
        self.writer.flush().map_err(SynaptrackError::Io)
    }
}

/// Reads a synapse table from a file.
pub fn read_synapse_table(path: &Path) -> Result<Vec<SynapseRecord>, SynaptrackError> {
    let file = File::open(path).map_err(SynaptrackError::Io)?;
    read_rows(BufReader::new(file), path)
}

/// Reads a synapse table from a string.
///
/// Useful for testing without file I/O.
pub fn from_synapse_table_str(tsv: &str) -> Result<Vec<SynapseRecord>, SynaptrackError> {
    from_synapse_table_slice(tsv.as_bytes())
}

/// Reads a synapse table from bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_synapse_table_slice(bytes: &[u8]) -> Result<Vec<SynapseRecord>, SynaptrackError> {
    read_rows(bytes, Path::new("<bytes>"))
}

/// Writes synapse records to a table string.
pub fn to_synapse_table_string(records: &[SynapseRecord]) -> Result<String, SynaptrackError> {
    let path = Path::new("<string>");
    let mut writer = SynapseTableWriter::new(Vec::new(), path)?;
    writer.append(records)?;
    let bytes = writer.into_inner()?;
    utf8(bytes, path)
}

/// Writes a merged synapse table to a file.
pub fn write_merged_table(path: &Path, merged: &[MergedSynapse]) -> Result<(), SynaptrackError> {
    let file = File::create(path).map_err(SynaptrackError::Io)?;
    write_rows(BufWriter::new(file), path, &MERGED_COLUMNS, merged)?
        .flush()
        .map_err(SynaptrackError::Io)
}

/// Writes a merged synapse table to a string.
pub fn to_merged_table_string(merged: &[MergedSynapse]) -> Result<String, SynaptrackError> {
    let path = Path::new("<string>");
    let bytes = write_rows(Vec::new(), path, &MERGED_COLUMNS, merged)?;
    utf8(bytes, path)
}

/// Reads a merged synapse table from a string.
pub fn from_merged_table_str(tsv: &str) -> Result<Vec<MergedSynapse>, SynaptrackError> {
    read_rows(tsv.as_bytes(), Path::new("<bytes>"))
}

fn read_rows<R: Read, T: DeserializeOwned>(
    reader: R,
    path: &Path,
) -> Result<Vec<T>, SynaptrackError> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: T = result.map_err(|source| SynaptrackError::TsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn write_rows<W: Write, T: Serialize>(
    inner: W,
    path: &Path,
    columns: &[&str],
    rows: &[T],
) -> Result<W, SynaptrackError> {
    let to_err = |source: csv::Error| SynaptrackError::TsvWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = writer_builder().from_writer(inner);
    writer.write_record(columns).map_err(to_err)?;
    for row in rows {
        writer.serialize(row).map_err(to_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| SynaptrackError::Io(e.into_error()))
}

fn utf8(bytes: Vec<u8>, path: &Path) -> Result<String, SynaptrackError> {
    String::from_utf8(bytes).map_err(|e| SynaptrackError::TsvInvalid {
        path: path.to_path_buf(),
        message: format!("Invalid UTF-8 in output: {}", e),
    })
}

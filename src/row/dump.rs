//! CSV row dumps.
//!
//! A dump has the header `row,family,qualifier,value`, one cell per line.
//! `value` is hex encoded; the other columns are text. Consecutive lines that
//! share a `row` form one row, so dumps must be grouped by row key (a sorted
//! table export satisfies this).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::trace;

use crate::error::SourceError;

use super::source::RowSource;
use super::{Row, RowBuilder};

const HEADER: [&str; 4] = ["row", "family", "qualifier", "value"];

/// Streams rows out of a CSV dump, one row per advance.
pub struct CsvRowSource<R> {
    reader: csv::Reader<R>,
    lookahead: Option<StringRecord>,
    current: Option<Row>,
    fused: bool,
}

impl CsvRowSource<File> {
    /// Opens a dump file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let reader = ReaderBuilder::new().from_path(path)?;
        Self::from_csv(reader)
    }
}

impl<R: Read> CsvRowSource<R> {
    /// Reads a dump from any byte stream.
    pub fn from_reader(rdr: R) -> Result<Self, SourceError> {
        Self::from_csv(ReaderBuilder::new().from_reader(rdr))
    }

    fn from_csv(mut reader: csv::Reader<R>) -> Result<Self, SourceError> {
        let headers = reader.headers()?;
        let names: Vec<&str> = headers.iter().map(str::trim).collect();
        if names != HEADER {
            return Err(SourceError::Format(format!(
                "expected header '{}', found '{}'",
                HEADER.join(","),
                names.join(",")
            )));
        }
        Ok(Self {
            reader,
            lookahead: None,
            current: None,
            fused: false,
        })
    }

    /// Reads the next line. A framing or text error fuses the source, since
    /// the rest of the current row can no longer be located.
    fn read_record(&mut self) -> Result<Option<StringRecord>, SourceError> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => Ok(Some(record)),
            Ok(false) => Ok(None),
            Err(err) => {
                self.fused = true;
                Err(err.into())
            }
        }
    }
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or_default()
}

fn push_cell(builder: &mut RowBuilder, record: &StringRecord) -> Result<(), SourceError> {
    let value = hex::decode(field(record, 3).trim()).map_err(|source| SourceError::Hex {
        line: record.position().map(|pos| pos.line()).unwrap_or(0),
        source,
    })?;
    builder.push(
        field(record, 1).as_bytes().to_vec(),
        field(record, 2).as_bytes().to_vec(),
        value,
    );
    Ok(())
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn advance(&mut self) -> Result<bool, SourceError> {
        self.current = None;
        if self.fused {
            return Ok(false);
        }
        let first = match self.lookahead.take() {
            Some(record) => record,
            None => match self.read_record()? {
                Some(record) => record,
                None => return Ok(false),
            },
        };
        let key = field(&first, 0).to_owned();
        let mut builder = Row::builder(key.clone().into_bytes());
        // A bad cell fails the whole row; its remaining lines are still
        // consumed so the next advance starts on the following row.
        let mut failure = push_cell(&mut builder, &first).err();
        while let Some(record) = self.read_record()? {
            if field(&record, 0) != key {
                self.lookahead = Some(record);
                break;
            }
            if failure.is_none() {
                failure = push_cell(&mut builder, &record).err();
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }
        let row = builder.build();
        trace!(row = %key, cells = row.cell_count(), "dump.row.read");
        self.current = Some(row);
        Ok(true)
    }

    fn current(&self) -> Option<&Row> {
        self.current.as_ref()
    }
}

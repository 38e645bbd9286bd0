//! Record source: one input file as a lazy stream of parsed rows.
//!
//! Rows are `name,group,population` with no header. Plain files are read as-is,
//! `*.zst` files are decoded on the fly. A bad row yields an `Err` and the stream
//! moves on; only an I/O failure ends it early.

use crate::config::SourceOptions;
use crate::record::{Record, RecordError};
use crate::util::open_with_backoff;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use zstd::stream::read::Decoder;

const FIELDS_PER_ROW: usize = 3;

pub struct RecordSource {
    path: PathBuf,
    rdr: csv::Reader<Box<dyn Read + Send>>,
    row: StringRecord,
    done: bool,
}

fn is_zstd(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("zst"))
}

impl RecordSource {
    /// Open `path` for streaming. Only open failures are returned here. A bad
    /// zstd stream surfaces on the first read as a terminal [`RecordError::Read`].
    pub fn open(path: &Path, opts: &SourceOptions) -> io::Result<Self> {
        let file = open_with_backoff(path, opts.open_retries, opts.open_backoff_ms)?;
        let input: Box<dyn Read + Send> = if is_zstd(path) {
            let mut decoder = Decoder::new(file)?;
            decoder.window_log_max(31)?;
            Box::new(decoder)
        } else {
            Box::new(file)
        };
        let rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .buffer_capacity(opts.read_buffer_bytes)
            .from_reader(input);
        Ok(Self { path: path.to_path_buf(), rdr, row: StringRecord::new(), done: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn current_line(&self) -> u64 {
        self.row.position().map_or(0, |p| p.line())
    }

    fn parse_row(&self) -> Result<Record, RecordError> {
        let line = self.current_line();
        if self.row.len() != FIELDS_PER_ROW {
            return Err(RecordError::FieldCount { path: self.path.clone(), line, found: self.row.len() });
        }
        let raw = &self.row[2];
        match raw.parse::<u64>() {
            Ok(population) => Ok(Record::new(&self.row[0], &self.row[1], population)),
            Err(source) => Err(RecordError::Population {
                path: self.path.clone(),
                line,
                value: raw.to_string(),
                source,
            }),
        }
    }
}

impl Iterator for RecordSource {
    type Item = Result<Record, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.rdr.read_record(&mut self.row) {
            Ok(true) => Some(self.parse_row()),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(source) if source.is_io_error() => {
                self.done = true;
                Some(Err(RecordError::Read { path: self.path.clone(), source }))
            }
            Err(source) => {
                let line = source.position().map_or(0, |p| p.line());
                Some(Err(RecordError::Malformed { path: self.path.clone(), line, source }))
            }
        }
    }
}

//! Record types shared by the source, the workers and the reducer.

use serde::Serialize;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// One city row that survived parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub group: String,
    pub population: u64,
}

impl Record {
    pub fn new(name: impl Into<String>, group: impl Into<String>, population: u64) -> Self {
        Self { name: name.into(), group: group.into(), population }
    }
}

/// A row that could not be turned into a [`Record`]. Never fatal for the file
/// unless the worker runs with [`RecordPolicy::AbortJob`](crate::RecordPolicy).
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{}:{line}: expected 3 fields, found {found}", .path.display())]
    FieldCount { path: PathBuf, line: u64, found: usize },

    #[error("{}:{line}: population {value:?} is not a non-negative integer: {source}", .path.display())]
    Population {
        path: PathBuf,
        line: u64,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{}:{line}: malformed row: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("{}: read failed: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl RecordError {
    /// True when the error ends the file rather than a single row.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordError::Read { .. })
    }
}

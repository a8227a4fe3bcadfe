use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::Axis;
use crate::node::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The dataset could not be opened or read.
    #[error("reading dataset {}: {source}", path.display())]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dataset was readable but a record (or the whole document) is malformed.
    /// `record` is 1-based when the failing record is known.
    #[error("parsing dataset {}{}: {reason}", path.display(), record.map(|r| format!(" (record {r})")).unwrap_or_default())]
    DatasetParse {
        path: PathBuf,
        record: Option<usize>,
        reason: String,
    },

    #[error("duplicate node id {id} (records {first} and {second})")]
    DuplicateNodeId {
        id: NodeId,
        first: usize,
        second: usize,
    },

    #[error("{axis} {value} is not a finite number")]
    InvalidCoordinate { axis: Axis, value: f64 },

    #[error("{axis} {value} is outside [{min}, {max}]")]
    OutOfRangeCoordinate {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid query {input:?}: {reason}")]
    InputFormat { input: String, reason: String },

    #[error("node set is empty")]
    EmptyNodeSet,
}

impl Error {
    /// Errors caused by the caller's query; the node set is still usable.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidCoordinate { .. }
                | Error::OutOfRangeCoordinate { .. }
                | Error::InputFormat { .. }
        )
    }
}

//! Loading and persisting node datasets.
//!
//! Records carry `id`, `lat`, `lon`, with coordinates already in nanodegrees.
//! Two encodings are understood: a JSON array of objects and a CSV file with an
//! `id,lat,lon` header.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codec::{decode, FixedCoord};
use crate::error::{Error, Result};
use crate::node::{Node, NodeId, NodeSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Csv,
}

impl DatasetFormat {
    /// Guess from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DatasetFormat::Json),
            "csv" => Some(DatasetFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: i64,
    lat: i64,
    lon: i64,
}

impl NodeRecord {
    fn into_node(self, path: &Path, record: usize) -> Result<Node> {
        let coord = FixedCoord::from_nanodegrees(self.lat, self.lon).map_err(|e| Error::DatasetParse {
            path: path.to_path_buf(),
            record: Some(record),
            reason: e.to_string(),
        })?;
        Ok(Node::new(NodeId(self.id), coord))
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.0,
            lat: node.lat(),
            lon: node.lon(),
        }
    }
}

/// Load a dataset, picking the format from the extension.
pub fn load(path: impl AsRef<Path>) -> Result<NodeSet> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path).ok_or_else(|| Error::DatasetParse {
        path: path.to_path_buf(),
        record: None,
        reason: "unknown dataset extension (expected .json or .csv)".to_string(),
    })?;
    load_with_format(path, format)
}

pub fn load_with_format(path: impl AsRef<Path>, format: DatasetFormat) -> Result<NodeSet> {
    let path = path.as_ref();
    let now = Instant::now();
    let file = File::open(path).map_err(|source| Error::DatasetRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let set = match format {
        DatasetFormat::Json => read_json(reader, path)?,
        DatasetFormat::Csv => read_csv(reader, path)?,
    };

    match set.bounds() {
        Some(b) => info!(
            path = %path.display(),
            nodes = set.count(),
            lat = %format!("[{}, {}]", decode(b.min_lat), decode(b.max_lat)),
            lon = %format!("[{}, {}]", decode(b.min_lon), decode(b.max_lon)),
            elapsed_ms = now.elapsed().as_secs_f64() * 1000.0,
            "loaded node set"
        ),
        None => info!(path = %path.display(), "loaded empty node set"),
    }
    Ok(set)
}

/// `origin` labels errors; it need not exist on disk.
pub fn read_json<R: Read>(reader: R, origin: &Path) -> Result<NodeSet> {
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(reader).map_err(|e| json_error(e, origin, None))?;
    debug!(records = values.len(), "parsed json dataset");

    let mut nodes = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        let record: NodeRecord =
            serde_json::from_value(value).map_err(|e| json_error(e, origin, Some(idx + 1)))?;
        nodes.push(record.into_node(origin, idx + 1)?);
    }
    NodeSet::new(nodes)
}

pub fn read_csv<R: Read>(reader: R, origin: &Path) -> Result<NodeSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut nodes = Vec::new();
    for (idx, result) in rdr.deserialize::<NodeRecord>().enumerate() {
        let record = result.map_err(|e| csv_error(e, origin, Some(idx + 1)))?;
        nodes.push(record.into_node(origin, idx + 1)?);
    }
    NodeSet::new(nodes)
}

pub fn write_json<W: Write>(set: &NodeSet, mut writer: W) -> io::Result<()> {
    let records: Vec<NodeRecord> = set.iter().map(NodeRecord::from).collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush()
}

pub fn write_csv<W: Write>(set: &NodeSet, writer: W) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for node in set {
        wtr.serialize(NodeRecord::from(node))?;
    }
    wtr.flush()
}

/// Write in the format implied by the extension.
pub fn save(set: &NodeSet, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path).ok_or_else(|| Error::DatasetParse {
        path: path.to_path_buf(),
        record: None,
        reason: "unknown dataset extension (expected .json or .csv)".to_string(),
    })?;
    let write_err = |source| Error::DatasetRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let writer = io::BufWriter::new(file);
    let written = match format {
        DatasetFormat::Json => write_json(set, writer),
        DatasetFormat::Csv => write_csv(set, writer),
    };
    written.map_err(write_err)
}

fn json_error(e: serde_json::Error, path: &Path, record: Option<usize>) -> Error {
    if e.is_io() {
        Error::DatasetRead {
            path: path.to_path_buf(),
            source: io::Error::from(e),
        }
    } else {
        Error::DatasetParse {
            path: path.to_path_buf(),
            record,
            reason: e.to_string(),
        }
    }
}

fn csv_error(e: csv::Error, path: &Path, record: Option<usize>) -> Error {
    let path: PathBuf = path.to_path_buf();
    let reason = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => Error::DatasetRead { path, source },
        _ => Error::DatasetParse {
            path,
            record,
            reason,
        },
    }
}

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::warn;

use walknode::logging::init_logging;
use walknode::resolver::DEFAULT_CELL_SIZE;
use walknode::store::{self, DatasetFormat};
use walknode::{GridIndex, LinearScan, NearestNeighbor, NodeSet, Query, Resolution};

#[derive(Parser, Debug)]
#[command(name = "nearest")]
#[command(about = "Resolve latitude,longitude queries to the nearest walkway node.", long_about = None)]
struct Cli {
    /// Node dataset (.json or .csv, coordinates in nanodegrees)
    #[arg(short, long, env = "WALKNODE_NODES")]
    nodes: PathBuf,

    #[arg(short, long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    #[arg(short, long, value_enum, default_value_t = IndexKind::Linear)]
    index: IndexKind,

    /// Grid cell edge in nanodegrees (grid index only)
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    cell_size: u32,

    /// Log filter, e.g. "debug"; defaults to RUST_LOG or "info"
    #[arg(long)]
    log_level: Option<String>,

    /// Queries as "latitude,longitude". Read from stdin, one per line, if omitted.
    #[arg(allow_hyphen_values = true)]
    queries: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Auto,
    Json,
    Csv,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum IndexKind {
    Linear,
    Grid,
}

fn load_nodes(cli: &Cli) -> Result<NodeSet> {
    let set = match cli.format {
        FormatArg::Auto => store::load(&cli.nodes),
        FormatArg::Json => store::load_with_format(&cli.nodes, DatasetFormat::Json),
        FormatArg::Csv => store::load_with_format(&cli.nodes, DatasetFormat::Csv),
    };
    set.with_context(|| format!("loading {}", cli.nodes.display()))
}

fn print_resolution(out: &mut impl Write, res: &Resolution) -> io::Result<()> {
    writeln!(
        out,
        "ID: {} (Lat: {}, Lon: {}) [{:.1} m]",
        res.node.id,
        res.node.coord.lat_degrees(),
        res.node.coord.lon_degrees(),
        res.meters()
    )
}

/// Answers one query per line. Rejected queries are logged and counted;
/// anything else aborts. Returns the number of rejected queries.
fn answer_all<R: BufRead, W: Write>(index: &dyn NearestNeighbor, input: R, out: &mut W) -> Result<usize> {
    let mut rejected = 0usize;
    for line in input.lines() {
        let line = line.context("reading queries")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Query>().and_then(|q| index.resolve(&q)) {
            Ok(res) => print_resolution(out, &res)?,
            Err(e) if e.is_caller_error() => {
                warn!(input = line, error = %e, "rejected query");
                rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
        out.flush()?;
    }
    Ok(rejected)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let nodes = load_nodes(&cli)?;
    let linear;
    let grid;
    let index: &dyn NearestNeighbor = match cli.index {
        IndexKind::Linear => {
            linear = LinearScan::new(&nodes);
            &linear
        }
        IndexKind::Grid => {
            grid = GridIndex::new(&nodes, cli.cell_size);
            &grid
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let rejected = if cli.queries.is_empty() {
        // Prompt for the interactive session, not a diagnostic.
        eprintln!("Enter coordinates as: latitude,longitude");
        answer_all(index, io::stdin().lock(), &mut out)?
    } else {
        answer_all(index, cli.queries.join("\n").as_bytes(), &mut out)?
    };

    Ok(if rejected == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use walknode::{FixedCoord, Node, NodeId};

    fn two_cities() -> NodeSet {
        NodeSet::new(vec![
            Node::new(NodeId(1), FixedCoord::from_nanodegrees(40_000_000_000, -73_000_000_000).unwrap()),
            Node::new(NodeId(2), FixedCoord::from_nanodegrees(41_000_000_000, -74_000_000_000).unwrap()),
        ])
        .unwrap()
    }

    #[test]
    fn keeps_answering_after_rejected_queries() {
        let set = two_cities();
        let index = LinearScan::new(&set);
        let mut out = Vec::new();
        let rejected = answer_all(&index, "abc\n91,0\n\n40.0,-73.0\n".as_bytes(), &mut out).unwrap();
        assert_eq!(rejected, 2);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 1);
        assert!(printed.starts_with("ID: 1 (Lat: 40, Lon: -73)"), "{printed}");
    }

    #[test]
    fn all_good_queries_reject_nothing() {
        let set = two_cities();
        let index = GridIndex::new(&set, DEFAULT_CELL_SIZE);
        let mut out = Vec::new();
        let rejected = answer_all(&index, "40.0,-73.0\n41.0,-74.0".as_bytes(), &mut out).unwrap();
        assert_eq!(rejected, 0);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.lines().nth(1).unwrap().starts_with("ID: 2 (Lat: 41, Lon: -74)"), "{printed}");
    }

    #[test]
    fn empty_node_set_aborts() {
        let set = NodeSet::default();
        let index = LinearScan::new(&set);
        let mut out = Vec::new();
        let err = answer_all(&index, "abc\n40.0,-73.0\n".as_bytes(), &mut out).unwrap_err();
        assert!(matches!(err.downcast_ref::<walknode::Error>(), Some(walknode::Error::EmptyNodeSet)));
        assert!(out.is_empty());
    }
}

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use walknode::logging::init_logging;
use walknode::osm::export_walkway_nodes;
use walknode::store;

#[derive(Parser, Debug)]
#[command(name = "export")]
#[command(about = "Extract walkway nodes from an OSM .pbf into a nanodegree node dataset.", long_about = None)]
struct Cli {
    /// Path to the .osm.pbf file
    #[arg(short, long)]
    pbf: PathBuf,

    /// Output dataset (.json or .csv)
    #[arg(short, long)]
    out: PathBuf,

    /// Only keep pedestrian highway classes. If false, any highway way is used.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    only_footways: bool,

    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let now = Instant::now();
    let nodes = export_walkway_nodes(&cli.pbf, cli.only_footways)?;
    store::save(&nodes, &cli.out).with_context(|| format!("writing {}", cli.out.display()))?;

    info!(
        nodes = nodes.count(),
        out = %cli.out.display(),
        elapsed_s = now.elapsed().as_secs_f64(),
        "wrote node dataset"
    );
    Ok(())
}

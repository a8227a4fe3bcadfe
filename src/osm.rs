//! Build a node dataset from an OpenStreetMap `.osm.pbf` extract.
//!
//! Pass 1 collects the node ids referenced by walkable ways; pass 2 reads
//! their coordinates. OSM stores positions as 10^-7 degree integers, so the
//! conversion to nanodegrees is an exact multiplication.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use fnv::FnvHashSet;
use osmpbfreader::{OsmObj, OsmPbfReader, Tags};
use tracing::{debug, info};

use crate::codec::FixedCoord;
use crate::node::{Node, NodeId, NodeSet};

const DECIMICRO_TO_NANO: i64 = 100;

/// Highway classes a pedestrian can use.
const FOOT_HIGHWAYS: &[&str] = &[
    "footway",
    "path",
    "pedestrian",
    "steps",
    "living_street",
    "residential",
    "service",
    "track",
    "cycleway",
    "corridor",
    "unclassified",
];

pub fn is_way_walkable(tags: &Tags, only_footways: bool) -> bool {
    let Some(highway) = tags.get("highway") else {
        return false;
    };
    if only_footways && !FOOT_HIGHWAYS.contains(&highway.as_str()) {
        return false;
    }
    // Exclude areas and ways closed to pedestrians
    if tags.get("area").map(|v| v == "yes").unwrap_or(false) {
        return false;
    }
    if tags.get("foot").map(|v| v == "no").unwrap_or(false) {
        return false;
    }
    if tags
        .get("access")
        .map(|v| v == "no" || v == "private")
        .unwrap_or(false)
    {
        return false;
    }
    true
}

pub fn export_walkway_nodes(pbf_path: &Path, only_footways: bool) -> Result<NodeSet> {
    // Pass 1: node ids referenced by walkable ways
    let file = File::open(pbf_path).with_context(|| format!("opening {}", pbf_path.display()))?;
    let mut pbf = OsmPbfReader::new(file);

    let mut needed: FnvHashSet<osmpbfreader::NodeId> = FnvHashSet::default();
    let mut ways = 0usize;
    for obj in pbf.iter() {
        let obj = obj?;
        if let OsmObj::Way(w) = obj {
            if is_way_walkable(&w.tags, only_footways) {
                needed.extend(w.nodes.iter().copied());
                ways += 1;
            }
        }
    }
    info!(ways, node_refs = needed.len(), "collected walkable ways");

    // Pass 2: coordinates, kept in file order
    let file = File::open(pbf_path).with_context(|| format!("reopening {}", pbf_path.display()))?;
    let mut pbf = OsmPbfReader::new(file);

    let mut nodes = Vec::with_capacity(needed.len());
    for obj in pbf.iter() {
        let obj = obj?;
        if let OsmObj::Node(n) = obj {
            if needed.contains(&n.id) {
                let coord = FixedCoord::from_nanodegrees(
                    i64::from(n.decimicro_lat) * DECIMICRO_TO_NANO,
                    i64::from(n.decimicro_lon) * DECIMICRO_TO_NANO,
                )
                .with_context(|| format!("node {}", n.id.0))?;
                nodes.push(Node::new(NodeId(n.id.0), coord));
            }
        }
    }
    let missing = needed.len().saturating_sub(nodes.len());
    if missing > 0 {
        debug!(missing, "referenced nodes absent from extract");
    }
    info!(nodes = nodes.len(), "loaded walkway node coordinates");

    Ok(NodeSet::new(nodes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        let mut tags = Tags::new();
        for &(k, v) in pairs {
            tags.insert(k.into(), v.into());
        }
        tags
    }

    #[test]
    fn footways_are_walkable() {
        assert!(is_way_walkable(&tags(&[("highway", "footway")]), true));
        assert!(is_way_walkable(&tags(&[("highway", "steps")]), true));
    }

    #[test]
    fn motorways_only_without_filter() {
        let motorway = tags(&[("highway", "motorway")]);
        assert!(!is_way_walkable(&motorway, true));
        assert!(is_way_walkable(&motorway, false));
    }

    #[test]
    fn closed_or_area_ways_are_skipped() {
        assert!(!is_way_walkable(&tags(&[("highway", "pedestrian"), ("area", "yes")]), true));
        assert!(!is_way_walkable(&tags(&[("highway", "footway"), ("foot", "no")]), true));
        assert!(!is_way_walkable(&tags(&[("highway", "service"), ("access", "private")]), true));
        assert!(!is_way_walkable(&tags(&[("building", "yes")]), false));
    }
}

//! Nearest-node resolution.
//!
//! [`LinearScan`] checks every node; [`GridIndex`] buckets nodes into square
//! fixed-point cells and searches outward ring by ring. Both return the node
//! with the smallest squared distance, and on equal distances the node that
//! comes first in the node set.

use fnv::FnvHashMap;
use tracing::debug;

use crate::codec::FixedCoord;
use crate::error::{Error, Result};
use crate::metric::{haversine_meters, squared_distance};
use crate::node::{Node, NodeSet};
use crate::query::Query;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub node: Node,
    /// The encoded query.
    pub target: FixedCoord,
    pub squared_distance: u128,
}

impl Resolution {
    /// Approximate ground distance between query and node. Diagnostic only.
    pub fn meters(&self) -> f64 {
        haversine_meters(&self.target, &self.node.coord)
    }
}

pub trait NearestNeighbor {
    /// Closest node to an already encoded coordinate.
    fn nearest(&self, target: &FixedCoord) -> Result<Resolution>;

    fn resolve(&self, query: &Query) -> Result<Resolution> {
        let target = query.to_fixed()?;
        let res = self.nearest(&target)?;
        debug!(
            query = %target,
            node = %res.node.id,
            squared_distance = %res.squared_distance,
            "resolved query"
        );
        Ok(res)
    }
}

/// Resolve `query` against `nodes` with an exhaustive scan.
pub fn resolve(query: &Query, nodes: &NodeSet) -> Result<Resolution> {
    LinearScan::new(nodes).resolve(query)
}

/// Resolve both ends of a route.
pub fn resolve_pair<N>(index: &N, origin: &Query, destination: &Query) -> Result<(Resolution, Resolution)>
where
    N: NearestNeighbor + ?Sized,
{
    Ok((index.resolve(origin)?, index.resolve(destination)?))
}

/// Returns (position, squared distance) of the first closest node.
fn scan(nodes: &[Node], target: &FixedCoord) -> Option<(usize, u128)> {
    let mut best: Option<(usize, u128)> = None;
    for (idx, node) in nodes.iter().enumerate() {
        let d = squared_distance(target, &node.coord);
        // Strict comparison keeps the earliest node on ties.
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((idx, d));
        }
    }
    best
}

fn resolution(nodes: &[Node], target: &FixedCoord, idx: usize, d: u128) -> Resolution {
    Resolution {
        node: nodes[idx],
        target: *target,
        squared_distance: d,
    }
}

pub struct LinearScan<'a> {
    nodes: &'a NodeSet,
}

impl<'a> LinearScan<'a> {
    pub fn new(nodes: &'a NodeSet) -> Self {
        Self { nodes }
    }
}

impl NearestNeighbor for LinearScan<'_> {
    fn nearest(&self, target: &FixedCoord) -> Result<Resolution> {
        let nodes = self.nodes.as_slice();
        let (idx, d) = scan(nodes, target).ok_or(Error::EmptyNodeSet)?;
        Ok(resolution(nodes, target, idx, d))
    }
}

/// Default grid cell edge: 0.001 degrees, about 111 m of latitude.
pub const DEFAULT_CELL_SIZE: u32 = 1_000_000;

type Cell = (i64, i64);

/// Uniform grid over fixed-point coordinates.
pub struct GridIndex<'a> {
    nodes: &'a NodeSet,
    cell_size: i64,
    cells: FnvHashMap<Cell, Vec<usize>>,
    min_cell: Cell,
    max_cell: Cell,
}

impl<'a> GridIndex<'a> {
    /// `cell_size` is the cell edge in nanodegrees; zero is treated as one.
    pub fn new(nodes: &'a NodeSet, cell_size: u32) -> Self {
        let cell_size = i64::from(cell_size.max(1));
        let mut cells: FnvHashMap<Cell, Vec<usize>> = FnvHashMap::default();
        let mut min_cell = (i64::MAX, i64::MAX);
        let mut max_cell = (i64::MIN, i64::MIN);
        for (idx, node) in nodes.iter().enumerate() {
            let cell = cell_of(&node.coord, cell_size);
            min_cell = (min_cell.0.min(cell.0), min_cell.1.min(cell.1));
            max_cell = (max_cell.0.max(cell.0), max_cell.1.max(cell.1));
            cells.entry(cell).or_default().push(idx);
        }
        debug!(
            nodes = nodes.count(),
            cells = cells.len(),
            cell_size,
            "built grid index"
        );
        Self {
            nodes,
            cell_size,
            cells,
            min_cell,
            max_cell,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn visit(&self, cell: Cell, target: &FixedCoord, best: &mut Option<(u128, usize)>) {
        let Some(members) = self.cells.get(&cell) else {
            return;
        };
        let nodes = self.nodes.as_slice();
        for &idx in members {
            let candidate = (squared_distance(target, &nodes[idx].coord), idx);
            if best.map_or(true, |b| candidate < b) {
                *best = Some(candidate);
            }
        }
    }
}

fn cell_of(coord: &FixedCoord, cell_size: i64) -> Cell {
    (coord.lat.div_euclid(cell_size), coord.lon.div_euclid(cell_size))
}

impl NearestNeighbor for GridIndex<'_> {
    fn nearest(&self, target: &FixedCoord) -> Result<Resolution> {
        if self.nodes.is_empty() {
            return Err(Error::EmptyNodeSet);
        }
        let nodes = self.nodes.as_slice();
        let (cy, cx) = cell_of(target, self.cell_size);
        let max_ring = [
            cy - self.min_cell.0,
            self.max_cell.0 - cy,
            cx - self.min_cell.1,
            self.max_cell.1 - cx,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
        .max(0);

        let size = i128::from(self.cell_size);
        let mut best: Option<(u128, usize)> = None;
        for r in 0..=max_ring {
            if let Some((d, _)) = best {
                // Every node outside rings 0..r is at least (r - 1) * size + 1 away on some axis.
                let reach = ((i128::from(r) - 1) * size + 1) as u128;
                if d < reach * reach {
                    break;
                }
            }
            let side = 2 * i128::from(r) + 1;
            if (side * side) as u128 > nodes.len() as u128 {
                debug!(query = %target, ring = r, "grid search wider than node set, scanning");
                let (idx, d) = scan(nodes, target).ok_or(Error::EmptyNodeSet)?;
                return Ok(resolution(nodes, target, idx, d));
            }

            if r == 0 {
                self.visit((cy, cx), target, &mut best);
                continue;
            }
            for dy in -r..=r {
                if dy.abs() == r {
                    for dx in -r..=r {
                        self.visit((cy + dy, cx + dx), target, &mut best);
                    }
                } else {
                    self.visit((cy + dy, cx - r), target, &mut best);
                    self.visit((cy + dy, cx + r), target, &mut best);
                }
            }
        }

        let (d, idx) = best.ok_or(Error::EmptyNodeSet)?;
        Ok(resolution(nodes, target, idx, d))
    }
}

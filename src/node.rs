use std::fmt;

use fnv::FnvHashMap;

use crate::codec::FixedCoord;
use crate::error::{Error, Result};

/// Walkway graph vertex identifier (an OSM node id in practice).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub coord: FixedCoord,
}

impl Node {
    pub fn new(id: NodeId, coord: FixedCoord) -> Self {
        Self { id, coord }
    }

    pub fn lat(&self) -> i64 {
        self.coord.lat
    }

    pub fn lon(&self) -> i64 {
        self.coord.lon
    }
}

/// Bounding box of a node set, in nanodegrees.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_lat: i64,
    pub max_lat: i64,
    pub min_lon: i64,
    pub max_lon: i64,
}

/// Immutable, uniquely identified collection of nodes.
///
/// Iteration order is the load order and decides ties during resolution.
#[derive(Clone, Debug, Default)]
pub struct NodeSet {
    nodes: Vec<Node>,
    by_id: FnvHashMap<NodeId, usize>,
}

impl NodeSet {
    /// Fails with [`Error::DuplicateNodeId`] if two nodes share an id. Positions in
    /// the error are 1-based.
    pub fn new(nodes: Vec<Node>) -> Result<Self> {
        let mut by_id = FnvHashMap::default();
        by_id.reserve(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            if let Some(&first) = by_id.get(&node.id) {
                return Err(Error::DuplicateNodeId {
                    id: node.id,
                    first: first + 1,
                    second: idx + 1,
                });
            }
            by_id.insert(node.id, idx);
        }
        Ok(Self { nodes, by_id })
    }

    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.by_id.get(&id).map(|&idx| &self.nodes[idx])
    }

    /// `None` for an empty set.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.nodes.first()?;
        let init = Bounds {
            min_lat: first.lat(),
            max_lat: first.lat(),
            min_lon: first.lon(),
            max_lon: first.lon(),
        };
        Some(self.nodes.iter().fold(init, |b, n| Bounds {
            min_lat: b.min_lat.min(n.lat()),
            max_lat: b.max_lat.max(n.lat()),
            min_lon: b.min_lon.min(n.lon()),
            max_lon: b.max_lon.max(n.lon()),
        }))
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, lat: i64, lon: i64) -> Node {
        Node::new(NodeId(id), FixedCoord::from_nanodegrees(lat, lon).unwrap())
    }

    #[test]
    fn keeps_load_order() {
        let set = NodeSet::new(vec![node(3, 0, 0), node(1, 1, 1), node(2, 2, 2)]).unwrap();
        let ids: Vec<i64> = set.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(set.count(), 3);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = NodeSet::new(vec![node(7, 0, 0), node(8, 1, 1), node(7, 2, 2)]).unwrap_err();
        match err {
            Error::DuplicateNodeId { id, first, second } => {
                assert_eq!(id, NodeId(7));
                assert_eq!((first, second), (1, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn looks_up_by_id() {
        let set = NodeSet::new(vec![node(10, 5, 6), node(11, 7, 8)]).unwrap();
        assert_eq!(set.get(NodeId(11)).map(|n| n.lat()), Some(7));
        assert!(set.get(NodeId(12)).is_none());
    }

    #[test]
    fn bounds_cover_every_node() {
        let set = NodeSet::new(vec![
            node(1, 40_910_000_000, -73_131_000_000),
            node(2, 40_919_000_000, -73_115_000_000),
            node(3, 40_915_000_000, -73_120_000_000),
        ])
        .unwrap();
        assert_eq!(
            set.bounds(),
            Some(Bounds {
                min_lat: 40_910_000_000,
                max_lat: 40_919_000_000,
                min_lon: -73_131_000_000,
                max_lon: -73_115_000_000,
            })
        );
        assert_eq!(NodeSet::default().bounds(), None);
    }
}

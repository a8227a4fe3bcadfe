//! Resolve free-form coordinates to the nearest vertex of a walkway graph.
//!
//! Coordinates are compared as fixed-point nanodegrees (degrees × 10^9).
//! A [`NodeSet`] is loaded once with [`store::load`] and then shared
//! read-only; [`resolve`] or a [`NearestNeighbor`] index maps a [`Query`]
//! to the closest [`Node`].

pub mod codec;
pub mod error;
pub mod logging;
pub mod metric;
pub mod node;
pub mod osm;
pub mod query;
pub mod resolver;
pub mod store;

pub use codec::{decode, encode, Axis, FixedCoord};
pub use error::{Error, Result};
pub use metric::squared_distance;
pub use node::{Bounds, Node, NodeId, NodeSet};
pub use query::Query;
pub use resolver::{resolve, resolve_pair, GridIndex, LinearScan, NearestNeighbor, Resolution};

//! Walkway graph components - nodes and edges

use geo::{Coord, Point};
use serde::Serialize;

use crate::{Meters, ModeSet, TravelMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Vertex or split point of the walkway network
    Network,
    /// Query-specific snap point inserted for a single route computation
    Temporary,
}

/// Walkway graph node
#[derive(Debug, Clone)]
pub struct WayNode {
    /// Node coordinates (lon/lat)
    pub geometry: Point<f64>,
    pub kind: NodeKind,
}

impl WayNode {
    pub fn network(coord: Coord<f64>) -> Self {
        Self {
            geometry: coord.into(),
            kind: NodeKind::Network,
        }
    }

    pub fn temporary(coord: Coord<f64>) -> Self {
        Self {
            geometry: coord.into(),
            kind: NodeKind::Temporary,
        }
    }

    pub fn coord(&self) -> Coord<f64> {
        self.geometry.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Piece of an input line
    Walkway,
    /// Synthesized link between lines that cross or nearly touch
    Connector,
    /// Link from a temporary snap node to the network
    Access,
}

/// Walkway graph edge
#[derive(Debug, Clone)]
pub struct WayEdge {
    /// Geodesic length between the end nodes
    pub length_m: Meters,
    pub modes: ModeSet,
    pub kind: EdgeKind,
}

impl WayEdge {
    pub fn allows(&self, mode: TravelMode) -> bool {
        self.modes.contains(mode)
    }
}

//! Debug overlay of a walkway graph for map inspection

use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use petgraph::visit::EdgeRef;
use serde::Deserialize;
use serde_json::json;

use crate::{Error, model::WayGraph, routing::SnapResult};

/// Layers included in the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    /// Every edge, labelled with its connected component
    pub edges: bool,
    /// Nodes with exactly one incident edge
    pub dead_ends: bool,
    /// Snap points and the segments they were projected onto
    pub snaps: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            edges: true,
            dead_ends: true,
            snaps: true,
        }
    }
}

/// Builds a feature collection describing the graph: `kind: "edge"`,
/// `"dead"`, `"snap"` and `"seg"` features.
pub fn debug_overlay(
    graph: &WayGraph,
    snaps: &[SnapResult],
    options: OverlayOptions,
) -> Result<FeatureCollection, Error> {
    let mut features = Vec::new();

    if options.edges {
        let components = graph.component_labels();
        for edge in graph.graph().edge_references() {
            let (from, to) = (edge.source(), edge.target());
            let weight = edge.weight();
            let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(vec![
                graph.graph()[from].coord(),
                graph.graph()[to].coord(),
            ])));
            features.push(feature(json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "kind": "edge",
                    "component": components[from.index()],
                    "edge_kind": weight.kind,
                    "modes": weight.modes.to_string(),
                    "length_m": weight.length_m,
                }
            }))?);
        }
    }

    if options.dead_ends {
        for node in graph.graph().node_indices() {
            if graph.degree(node) != 1 {
                continue;
            }
            let geometry = Geometry::new(GeoJsonValue::from(&graph.graph()[node].geometry));
            features.push(feature(json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "kind": "dead",
                    "node": node.index(),
                }
            }))?);
        }
    }

    if options.snaps {
        for (idx, snap) in snaps.iter().enumerate() {
            let point = Geometry::new(GeoJsonValue::from(&Point::from(snap.coord)));
            features.push(feature(json!({
                "type": "Feature",
                "geometry": point,
                "properties": {
                    "kind": "snap",
                    "index": idx,
                    "segment": snap.segment,
                    "distance_m": snap.distance_m,
                    "modes": snap.modes.to_string(),
                }
            }))?);

            let segment = Geometry::new(GeoJsonValue::from(&LineString::new(vec![
                snap.segment_start,
                snap.segment_end,
            ])));
            features.push(feature(json!({
                "type": "Feature",
                "geometry": segment,
                "properties": {
                    "kind": "seg",
                    "index": idx,
                    "segment": snap.segment,
                }
            }))?);
        }
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

fn feature(value: serde_json::Value) -> Result<Feature, Error> {
    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

//! Per-query routing: snapping, temporary nodes, shortest paths and results

pub mod dijkstra;
pub mod itinerary;
pub mod route;
pub mod snap;
pub mod splice;

pub use dijkstra::{ShortestPath, reachable_count, shortest_path};
pub use itinerary::{Connector, RouteDiagnostics, RouteResult, RouteSummary, assemble_route};
pub use route::{RouteRequest, compute_route};
pub use snap::{SnapResult, snap_to_network};
pub use splice::insert_temporary_node;

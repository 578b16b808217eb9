//! This module is responsible for loading walkway data and routing settings
//! and building the per-query walkway graph.

mod builder;
mod config;
mod features;

pub use builder::build_way_graph;
pub use config::{FALLBACK_SPEED_MPS, RouteLimits, RoutingConfig, Tolerances};

//! Data model for venue wayfinding
//!
//! Contains the raw walkway network handed in by the caller, the segments
//! derived from it and the routable graph built for a single query.

pub mod modes;
pub mod network;
pub mod segment;
pub mod walkways;

pub use modes::{ModeSet, TravelMode};
pub use network::{WalkwayLine, WalkwayNetwork};
pub use segment::{Cut, CutRef, Segment};
pub use walkways::{EdgeKind, NodeKind, WayEdge, WayGraph, WayNode};

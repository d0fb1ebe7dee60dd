//! Sea route library entry points.
//!
//! This crate exposes helpers to locate the maritime network dataset, prepare
//! it into a routing graph, and compose multi-waypoint sea routes that are safe
//! to draw across the antimeridian. Higher-level consumers (the CLI) should
//! only depend on the functions exported here instead of reimplementing
//! behavior.
//!

#![deny(warnings)]

pub mod cache;
pub mod coords;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod output;
pub mod path;
pub mod routing;
pub mod spatial;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use cache::{cache_path, load_prepared_edges, save_prepared_edges};
pub use coords::{
    adjust_antimeridian_pair, great_circle_km, normalize_longitude, spans_antimeridian,
    validate_position, Position,
};
pub use dataset::{
    default_dataset_path, load_navigable_lines, resolve_dataset, DatasetPaths, NavigableLines,
};
pub use error::{Error, ErrorKind, ErrorReport, Result};
pub use geometry::{segment, split_at_antimeridian, GeometryKind, RouteGeometry};
pub use graph::{load_graph, prepare_edges, Edge, GraphLoadOptions, GraphStore, RoutingGraph};
pub use output::{PassageCollection, RouteFeature, RouteRenderMode, RouteSummary};
pub use routing::{
    compose_route, compose_routes, find_path, plan_route, LegRouting, PathSegment,
    RouteAlgorithm, RouteLeg, RouteOptions, RouteRequest, StitchedRoute,
};

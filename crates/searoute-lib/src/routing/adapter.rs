//! Single origin/destination search against the routing graph.

use serde::Serialize;
use tracing::debug;

use crate::coords::Position;
use crate::error::{Error, Result};
use crate::graph::{RoutingGraph, VertexId};

use super::planner::{DijkstraPlanner, RoutePlanner};

/// Graph path for one origin/destination pair, ordered origin-first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSegment {
    /// Graph vertex positions; the first is nearest the origin.
    pub points: Vec<Position>,
    /// Total length of the traversed graph edges in metres.
    pub distance_m: f64,
}

impl PathSegment {
    pub fn first(&self) -> Option<Position> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Position> {
        self.points.last().copied()
    }
}

/// Find the graph path between two coordinates using Dijkstra's algorithm.
///
/// See [`find_path_with`].
pub fn find_path(
    graph: &RoutingGraph,
    origin: Position,
    destination: Position,
    tolerance_km: f64,
) -> Result<PathSegment> {
    find_path_with(&DijkstraPlanner, graph, origin, destination, tolerance_km)
}

/// Find the graph path between two coordinates with the given planner.
///
/// Both coordinates are snapped to their nearest graph vertex; if either vertex
/// is further than `tolerance_km` away, or the vertices are not connected, the
/// call fails with [`Error::PathNotFound`]. The planner's goal-first output is
/// reversed so the returned points run from the origin side to the destination
/// side.
pub fn find_path_with(
    planner: &dyn RoutePlanner,
    graph: &RoutingGraph,
    origin: Position,
    destination: Position,
    tolerance_km: f64,
) -> Result<PathSegment> {
    let not_found = |reason: String| Error::PathNotFound {
        origin,
        destination,
        reason,
    };

    let start = snap(graph, origin, tolerance_km).map_err(|r| not_found(format!("origin {r}")))?;
    let goal = snap(graph, destination, tolerance_km)
        .map_err(|r| not_found(format!("destination {r}")))?;

    let native = planner.search(graph, start, goal).ok_or_else(|| {
        not_found("no connected path between the nearest graph vertices".to_string())
    })?;

    let mut vertices = native.vertices;
    vertices.reverse();
    let points: Vec<Position> = vertices
        .iter()
        .filter_map(|&vertex| graph.position(vertex))
        .collect();

    debug!(
        algorithm = %planner.algorithm(),
        points = points.len(),
        distance_m = native.distance_m,
        "graph path found"
    );

    Ok(PathSegment {
        points,
        distance_m: native.distance_m,
    })
}

fn snap(
    graph: &RoutingGraph,
    position: Position,
    tolerance_km: f64,
) -> std::result::Result<VertexId, String> {
    match graph.nearest_vertex(position) {
        None => Err("cannot be snapped: the graph has no vertices".to_string()),
        Some((_, distance)) if !(distance <= tolerance_km) => Err(format!(
            "is {:.1} km from the nearest graph vertex (tolerance {:.1} km)",
            distance, tolerance_km
        )),
        Some((vertex, _)) => Ok(vertex),
    }
}

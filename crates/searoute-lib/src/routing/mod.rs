//! Route composition over the maritime routing graph.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (Dijkstra, A*)
//! - [`RouteOptions`] - Snapping tolerance, algorithm and fallback policy
//! - [`RouteRequest`] - Ordered waypoints plus options
//! - [`StitchedRoute`] - The composed route with per-leg details
//! - [`plan_route`] - Main entry point for composing a route
//!
//! # Strategy Pattern
//!
//! Searches go through the [`RoutePlanner`] trait. Each algorithm is
//! encapsulated in its own planner struct, so the stitching logic does not
//! depend on which search produced a path.
//!
//! # Example
//!
//! ```ignore
//! use searoute_lib::{compose_route, load_graph, resolve_dataset, GraphLoadOptions, Position};
//!
//! let paths = resolve_dataset(None)?;
//! let graph = load_graph(&paths, &GraphLoadOptions::default())?;
//! let route = compose_route(&graph, &[Position::new(-74.0, 40.7), Position::new(31.2, 30.0)])?;
//! println!("{:.1} km over {} legs", route.distance_km, route.leg_count());
//! ```

mod adapter;
mod planner;

pub use adapter::{find_path, find_path_with, PathSegment};
pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coords::{adjust_antimeridian_pair, great_circle_km, spans_antimeridian, Position};
use crate::error::{Error, Result};
use crate::graph::RoutingGraph;

/// Default maximum snapping distance between a waypoint and the graph.
pub const DEFAULT_SNAP_TOLERANCE_KM: f64 = 250.0;

/// Supported search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm.
    Dijkstra,
    /// A* search guided by great-circle distance.
    #[default]
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

/// Options applied to every leg of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Maximum distance between a waypoint and its nearest graph vertex.
    pub snap_tolerance_km: f64,
    pub algorithm: RouteAlgorithm,
    /// Replace unroutable legs with a direct great-circle connection instead
    /// of failing the whole request.
    pub allow_fallback: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            snap_tolerance_km: DEFAULT_SNAP_TOLERANCE_KM,
            algorithm: RouteAlgorithm::default(),
            allow_fallback: true,
        }
    }
}

/// High-level route composition request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Ordered waypoints; the route visits them in sequence.
    pub waypoints: Vec<Position>,
    pub name: Option<String>,
    pub options: RouteOptions,
}

impl RouteRequest {
    pub fn new(waypoints: impl Into<Vec<Position>>) -> Self {
        Self {
            waypoints: waypoints.into(),
            name: None,
            options: RouteOptions::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_options(mut self, options: RouteOptions) -> Self {
        self.options = options;
        self
    }
}

/// How a single leg was connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LegRouting {
    /// The leg follows the routing graph.
    Routed,
    /// No graph path was found; the leg is a direct great-circle line.
    Fallback { reason: String },
}

/// One consecutive waypoint pair of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub index: usize,
    pub origin: Position,
    pub destination: Position,
    /// Access leg from the origin to the first graph point.
    pub origin_access_km: f64,
    /// Access leg from the last graph point to the destination.
    pub destination_access_km: f64,
    pub graph_km: f64,
    pub distance_km: f64,
    /// Number of graph vertices the leg passes through.
    pub graph_points: usize,
    pub routing: LegRouting,
    /// Graph vertex positions of the leg, origin side first. Empty for fallbacks.
    #[serde(skip_serializing)]
    pub path: Vec<Position>,
}

impl RouteLeg {
    pub fn is_fallback(&self) -> bool {
        matches!(self.routing, LegRouting::Fallback { .. })
    }
}

/// A complete route through every requested waypoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StitchedRoute {
    pub name: Option<String>,
    pub algorithm: RouteAlgorithm,
    /// Ordered route coordinates, starting at the first waypoint and ending at
    /// the last.
    pub coordinates: Vec<Position>,
    pub distance_km: f64,
    pub legs: Vec<RouteLeg>,
}

impl StitchedRoute {
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    pub fn fallback_count(&self) -> usize {
        self.legs.iter().filter(|leg| leg.is_fallback()).count()
    }

    /// Whether every leg was routed over the graph.
    pub fn is_fully_routed(&self) -> bool {
        self.fallback_count() == 0
    }
}

/// Compose a route through `waypoints` with default [`RouteOptions`].
pub fn compose_route(graph: &RoutingGraph, waypoints: &[Position]) -> Result<StitchedRoute> {
    plan_route(graph, &RouteRequest::new(waypoints))
}

/// Compose a route for a request.
///
/// All waypoints are validated before any search runs, so an invalid waypoint
/// never produces a partial route. Each consecutive pair is then searched
/// independently; the search destination is shifted by 360° when the pair
/// spans the antimeridian, while the route itself always records the
/// normalised waypoints and graph vertex positions.
///
/// Consecutive identical coordinates are written once. Besides the point
/// shared by neighbouring legs, this also collapses a waypoint lying exactly
/// on its nearest graph vertex, so a leg can contribute fewer coordinates than
/// its `graph_points` plus two.
pub fn plan_route(graph: &RoutingGraph, request: &RouteRequest) -> Result<StitchedRoute> {
    if request.waypoints.len() < 2 {
        return Err(Error::InsufficientWaypoints {
            count: request.waypoints.len(),
        });
    }

    let waypoints = request
        .waypoints
        .iter()
        .map(|waypoint| waypoint.validated())
        .collect::<Result<Vec<_>>>()?;

    let planner = select_planner(request.options.algorithm);
    let mut coordinates = Vec::new();
    let mut legs = Vec::with_capacity(waypoints.len() - 1);
    let mut distance_km = 0.0;

    for (index, pair) in waypoints.windows(2).enumerate() {
        let (origin, destination) = (pair[0], pair[1]);
        if index == 0 {
            coordinates.push(origin);
        }

        let (leg, points) = stitch_leg(
            planner.as_ref(),
            graph,
            index,
            origin,
            destination,
            &request.options,
        )?;

        for point in points {
            push_point(&mut coordinates, point);
        }
        distance_km += leg.distance_km;
        legs.push(leg);
    }

    debug!(
        legs = legs.len(),
        points = coordinates.len(),
        distance_km,
        "route composed"
    );

    Ok(StitchedRoute {
        name: request.name.clone(),
        algorithm: request.options.algorithm,
        coordinates,
        distance_km,
        legs,
    })
}

/// Compose several independent routes in parallel against one graph.
///
/// Results are returned in request order; one failing request does not affect
/// the others.
pub fn compose_routes(
    graph: &RoutingGraph,
    requests: &[RouteRequest],
) -> Vec<Result<StitchedRoute>> {
    requests
        .par_iter()
        .map(|request| plan_route(graph, request))
        .collect()
}

/// Route one waypoint pair, returning the leg and the points it contributes
/// after its origin (graph points followed by the destination).
fn stitch_leg(
    planner: &dyn RoutePlanner,
    graph: &RoutingGraph,
    index: usize,
    origin: Position,
    destination: Position,
    options: &RouteOptions,
) -> Result<(RouteLeg, Vec<Position>)> {
    let search_destination = if spans_antimeridian(origin, destination) {
        adjust_antimeridian_pair(origin, destination)
    } else {
        destination
    };

    match find_path_with(
        planner,
        graph,
        origin,
        search_destination,
        options.snap_tolerance_km,
    ) {
        Ok(segment) => Ok(routed_leg(index, origin, destination, segment)),
        Err(Error::PathNotFound { reason, .. }) if options.allow_fallback => {
            warn!(
                leg = index,
                origin = %origin,
                destination = %destination,
                reason = %reason,
                "no graph path, falling back to a direct connection"
            );
            let distance_km = great_circle_km(origin, destination);
            let leg = RouteLeg {
                index,
                origin,
                destination,
                origin_access_km: 0.0,
                destination_access_km: 0.0,
                graph_km: 0.0,
                distance_km,
                graph_points: 0,
                routing: LegRouting::Fallback { reason },
                path: Vec::new(),
            };
            Ok((leg, vec![destination]))
        }
        Err(Error::PathNotFound { reason, .. }) => Err(Error::PathNotFound {
            origin,
            destination,
            reason,
        }),
        Err(other) => Err(other),
    }
}

fn routed_leg(
    index: usize,
    origin: Position,
    destination: Position,
    segment: PathSegment,
) -> (RouteLeg, Vec<Position>) {
    let origin_access_km = segment
        .first()
        .map(|first| great_circle_km(origin, first))
        .unwrap_or(0.0);
    let destination_access_km = segment
        .last()
        .map(|last| great_circle_km(last, destination))
        .unwrap_or(0.0);
    let graph_km = segment.distance_m / 1000.0;
    let distance_km = origin_access_km + graph_km + destination_access_km;

    debug!(
        leg = index,
        graph_points = segment.points.len(),
        origin_access_km,
        graph_km,
        destination_access_km,
        "leg routed"
    );

    let mut points = segment.points.clone();
    points.push(destination);

    let leg = RouteLeg {
        index,
        origin,
        destination,
        origin_access_km,
        destination_access_km,
        graph_km,
        distance_km,
        graph_points: segment.points.len(),
        routing: LegRouting::Routed,
        path: segment.points,
    };
    (leg, points)
}

/// Append `point` unless it repeats the previous coordinate exactly.
fn push_point(coordinates: &mut Vec<Position>, point: Position) {
    if coordinates.last() != Some(&point) {
        coordinates.push(point);
    }
}

// Test-only helpers for `searoute-lib` tests
#![allow(dead_code)]

use crate::coords::Position;
use crate::dataset::NavigableLines;
use crate::graph::RoutingGraph;

/// Build navigable lines from `(longitude, latitude)` tuples.
pub fn lines(lines: &[&[(f64, f64)]]) -> NavigableLines {
    NavigableLines::new(
        lines
            .iter()
            .map(|line| line.iter().copied().map(Position::from).collect())
            .collect(),
    )
}

/// Build a routing graph from `(longitude, latitude)` tuples.
pub fn graph_from_lines(raw: &[&[(f64, f64)]]) -> RoutingGraph {
    RoutingGraph::from_lines(&lines(raw))
}

pub fn pos(longitude: f64, latitude: f64) -> Position {
    Position::new(longitude, latitude)
}

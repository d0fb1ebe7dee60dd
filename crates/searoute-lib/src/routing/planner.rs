//! Search strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and implementations for the
//! supported shortest-path algorithms (Dijkstra, A*). Every planner honours the
//! same contract: the returned [`NativePath`] is ordered goal-first.

use crate::graph::{RoutingGraph, VertexId};
use crate::path::{search_a_star, search_dijkstra, NativePath};

use super::RouteAlgorithm;

/// Trait for shortest-path search strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Search the graph between two vertices.
    ///
    /// Returns `Some(path)` (goal-first) if the vertices are connected.
    fn search(&self, graph: &RoutingGraph, start: VertexId, goal: VertexId)
        -> Option<NativePath>;
}

/// Dijkstra's algorithm planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn search(
        &self,
        graph: &RoutingGraph,
        start: VertexId,
        goal: VertexId,
    ) -> Option<NativePath> {
        search_dijkstra(graph, start, goal)
    }
}

/// A* planner using great-circle distance as the heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn search(
        &self,
        graph: &RoutingGraph,
        start: VertexId,
        goal: VertexId,
    ) -> Option<NativePath> {
        search_a_star(graph, start, goal)
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_planner_chooses_correct_type() {
        assert_eq!(
            select_planner(RouteAlgorithm::Dijkstra).algorithm(),
            RouteAlgorithm::Dijkstra
        );
        assert_eq!(
            select_planner(RouteAlgorithm::AStar).algorithm(),
            RouteAlgorithm::AStar
        );
    }
}

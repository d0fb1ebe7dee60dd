//! Shortest-path search primitives over a [`RoutingGraph`].
//!
//! Both searches report the path in their native order: the goal vertex first,
//! walking parent links back to the start. Callers that need origin-first
//! order must reverse it (see [`crate::routing::find_path`]).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::coords::great_circle_m;
use crate::graph::{RoutingGraph, VertexId};

/// Result of a search: vertices ordered goal-first, plus total edge length.
#[derive(Debug, Clone, PartialEq)]
pub struct NativePath {
    /// Vertices from the goal back to the start.
    pub vertices: Vec<VertexId>,
    /// Sum of traversed edge lengths in metres.
    pub distance_m: f64,
}

/// Run Dijkstra's algorithm to find the shortest path between two vertices.
pub fn search_dijkstra(
    graph: &RoutingGraph,
    start: VertexId,
    goal: VertexId,
) -> Option<NativePath> {
    if start == goal {
        return Some(NativePath {
            vertices: vec![start],
            distance_m: 0.0,
        });
    }

    let mut distances: HashMap<VertexId, f64> = HashMap::new();
    let mut parents: HashMap<VertexId, Option<VertexId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(&entry.node) {
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == goal {
            return Some(NativePath {
                vertices: walk_back(&parents, start, goal),
                distance_m: current_distance,
            });
        }

        for link in graph.neighbours(entry.node) {
            let next_cost = current_distance + link.distance_m;
            if next_cost < *distances.get(&link.target).unwrap_or(&f64::INFINITY) {
                distances.insert(link.target, next_cost);
                parents.insert(link.target, Some(entry.node));
                queue.push(QueueEntry::new(link.target, next_cost));
            }
        }
    }

    None
}

/// Run A* search guided by the great-circle distance to the goal.
///
/// Edge weights are great-circle lengths, so the heuristic never overestimates
/// and the result has the same length as [`search_dijkstra`].
pub fn search_a_star(graph: &RoutingGraph, start: VertexId, goal: VertexId) -> Option<NativePath> {
    if start == goal {
        return Some(NativePath {
            vertices: vec![start],
            distance_m: 0.0,
        });
    }

    let goal_position = graph.position(goal)?;
    let heuristic = |vertex: VertexId| {
        graph
            .position(vertex)
            .map(|position| great_circle_m(position, goal_position))
            .unwrap_or(0.0)
    };

    let mut g_score: HashMap<VertexId, f64> = HashMap::new();
    let mut parents: HashMap<VertexId, Option<VertexId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    g_score.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(AStarEntry::new(start, 0.0, heuristic(start)));

    while let Some(entry) = queue.pop() {
        let current_score = match g_score.get(&entry.node) {
            Some(score) if *score < entry.cost.0 => continue,
            Some(score) => *score,
            None => continue,
        };

        if entry.node == goal {
            return Some(NativePath {
                vertices: walk_back(&parents, start, goal),
                distance_m: current_score,
            });
        }

        for link in graph.neighbours(entry.node) {
            let tentative_g = current_score + link.distance_m;
            if tentative_g < *g_score.get(&link.target).unwrap_or(&f64::INFINITY) {
                g_score.insert(link.target, tentative_g);
                parents.insert(link.target, Some(entry.node));
                queue.push(AStarEntry::new(
                    link.target,
                    tentative_g,
                    heuristic(link.target),
                ));
            }
        }
    }

    None
}

/// Follow parent links from `goal` to `start`; the result stays goal-first.
fn walk_back(
    parents: &HashMap<VertexId, Option<VertexId>>,
    start: VertexId,
    goal: VertexId,
) -> Vec<VertexId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: VertexId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: VertexId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: VertexId,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: VertexId, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

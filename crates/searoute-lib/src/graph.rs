use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::{dataset_checksum, save_prepared_edges, try_load_prepared_edges};
use crate::coords::{great_circle_km, great_circle_m, normalize_longitude, Position};
use crate::dataset::{parse_navigable_lines, read_dataset, DatasetPaths, NavigableLines};
use crate::error::{Error, Result};
use crate::spatial::VertexIndex;

/// Edge endpoints closer than this (in degrees, per axis) share one graph vertex.
pub const VERTEX_MERGE_TOLERANCE_DEG: f64 = 0.00001;

/// Identifier of a vertex within a [`RoutingGraph`].
pub type VertexId = usize;

/// One traversable two-point segment of the maritime network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: Position,
    pub to: Position,
}

impl Edge {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Great-circle length of the edge in metres.
    pub fn length_m(&self) -> f64 {
        great_circle_m(self.from, self.to)
    }
}

/// Decompose navigable lines into two-point edges.
///
/// Each line contributes one edge per consecutive pair of positions; lines with
/// fewer than two positions contribute nothing. Already-split input maps each
/// line onto exactly one edge.
pub fn prepare_edges(lines: &NavigableLines) -> Vec<Edge> {
    let capacity = lines
        .lines
        .iter()
        .map(|line| line.len().saturating_sub(1))
        .sum();
    let mut edges = Vec::with_capacity(capacity);

    for line in &lines.lines {
        edges.extend(line.windows(2).map(|pair| Edge::new(pair[0], pair[1])));
    }

    edges
}

/// Adjacency entry: the neighbouring vertex and the edge length in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub target: VertexId,
    pub distance_m: f64,
}

/// Read-only routing graph built from two-point edges.
///
/// Endpoints that agree to within [`VERTEX_MERGE_TOLERANCE_DEG`] on both axes
/// share one vertex, with longitudes -180 and 180 treated as the same meridian. Every edge is
/// traversable in both directions.
pub struct RoutingGraph {
    vertices: Vec<Position>,
    adjacency: Vec<Vec<Link>>,
    edge_count: usize,
    index: VertexIndex,
}

impl RoutingGraph {
    /// Build a graph from prepared two-point edges.
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut builder = GraphBuilder::default();
        for edge in edges {
            builder.add_edge(edge);
        }
        builder.finish()
    }

    /// Decompose raw navigable lines and build a graph from the result.
    pub fn from_lines(lines: &NavigableLines) -> Self {
        Self::from_edges(&prepare_edges(lines))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of distinct (non-degenerate) edges added to the graph.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }

    pub fn position(&self, vertex: VertexId) -> Option<Position> {
        self.vertices.get(vertex).copied()
    }

    /// Return the neighbours for a given vertex.
    pub fn neighbours(&self, vertex: VertexId) -> &[Link] {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nearest graph vertex to `position` and its great-circle distance in kilometres.
    pub fn nearest_vertex(&self, position: Position) -> Option<(VertexId, f64)> {
        let vertex = self.index.nearest(position)?;
        let distance = great_circle_km(position, self.vertices[vertex]);
        Some((vertex, distance))
    }
}

impl fmt::Debug for RoutingGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingGraph")
            .field("vertex_count", &self.vertices.len())
            .field("edge_count", &self.edge_count)
            .finish()
    }
}

type VertexKey = (i64, i64);

/// Number of merge-grid cells around the globe in longitude.
const LONGITUDE_CELLS: i64 = 36_000_000;

fn vertex_key(position: Position) -> VertexKey {
    let longitude = normalize_longitude(position.longitude);
    (
        wrap_longitude_cell((longitude / VERTEX_MERGE_TOLERANCE_DEG).round() as i64),
        (position.latitude / VERTEX_MERGE_TOLERANCE_DEG).round() as i64,
    )
}

/// Fold a longitude cell index into `[-LONGITUDE_CELLS / 2, LONGITUDE_CELLS / 2)`,
/// so the cells on either side of the antimeridian are neighbours.
fn wrap_longitude_cell(cell: i64) -> i64 {
    let half = LONGITUDE_CELLS / 2;
    (cell + half).rem_euclid(LONGITUDE_CELLS) - half
}

/// Largest per-axis separation between two positions, in degrees, measuring
/// longitude the short way round.
fn axis_separation_deg(a: Position, b: Position) -> f64 {
    let longitude = (a.longitude - b.longitude).abs() % 360.0;
    let longitude = longitude.min(360.0 - longitude);
    longitude.max((a.latitude - b.latitude).abs())
}

#[derive(Default)]
struct GraphBuilder {
    vertices: Vec<Position>,
    keys: HashMap<VertexKey, VertexId>,
    adjacency: Vec<Vec<Link>>,
    edge_count: usize,
}

impl GraphBuilder {
    fn vertex(&mut self, position: Position) -> VertexId {
        let key = vertex_key(position);
        if let Some(&id) = self.keys.get(&key) {
            return id;
        }
        if let Some(id) = self.neighbouring_vertex(key, position) {
            return id;
        }
        let id = self.vertices.len();
        self.vertices.push(position);
        self.adjacency.push(Vec::new());
        self.keys.insert(key, id);
        id
    }

    /// Closest vertex within merge tolerance held by one of the eight grid
    /// cells around `key`. Rounding can put two positions a hair apart into
    /// adjacent cells.
    fn neighbouring_vertex(&self, key: VertexKey, position: Position) -> Option<VertexId> {
        let (longitude, latitude) = key;
        let mut best: Option<(VertexId, f64)> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let cell = (wrap_longitude_cell(longitude + dx), latitude + dy);
                let Some(&id) = self.keys.get(&cell) else {
                    continue;
                };
                let separation = axis_separation_deg(self.vertices[id], position);
                let closer = match best {
                    Some((_, closest)) => separation < closest,
                    None => true,
                };
                if separation <= VERTEX_MERGE_TOLERANCE_DEG && closer {
                    best = Some((id, separation));
                }
            }
        }

        best.map(|(id, _)| id)
    }

    fn add_edge(&mut self, edge: &Edge) {
        let from = self.vertex(edge.from);
        let to = self.vertex(edge.to);
        if from == to {
            return;
        }

        let distance_m = edge.length_m();
        self.adjacency[from].push(Link {
            target: to,
            distance_m,
        });
        self.adjacency[to].push(Link {
            target: from,
            distance_m,
        });
        self.edge_count += 1;
    }

    fn finish(self) -> RoutingGraph {
        let index = VertexIndex::build(&self.vertices);
        RoutingGraph {
            vertices: self.vertices,
            adjacency: self.adjacency,
            edge_count: self.edge_count,
            index,
        }
    }
}

/// Options controlling how a graph is loaded from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLoadOptions {
    /// Read and write the prepared graph cache next to the dataset.
    pub use_cache: bool,
}

impl Default for GraphLoadOptions {
    fn default() -> Self {
        Self { use_cache: true }
    }
}

/// Load the routing graph for a dataset.
///
/// A fresh prepared-edge cache is used when available; otherwise the raw
/// dataset is decomposed and the cache is rewritten. Cache problems are logged
/// and never fail the load.
pub fn load_graph(paths: &DatasetPaths, options: &GraphLoadOptions) -> Result<RoutingGraph> {
    let bytes = read_dataset(&paths.dataset)?;
    let checksum = dataset_checksum(&bytes);

    let cached = if options.use_cache {
        try_load_prepared_edges(&paths.cache, &checksum)
    } else {
        None
    };

    let edges = match cached {
        Some(edges) => edges,
        None => {
            let lines = parse_navigable_lines(&bytes, &paths.dataset)?;
            let edges = prepare_edges(&lines);
            info!(
                lines = lines.len(),
                edges = edges.len(),
                "decomposed navigable lines into edges"
            );
            if options.use_cache {
                if let Err(error) = save_prepared_edges(&paths.cache, &checksum, &edges) {
                    warn!(
                        path = %paths.cache.display(),
                        %error,
                        "failed to write prepared graph cache"
                    );
                }
            }
            edges
        }
    };

    let graph = RoutingGraph::from_edges(&edges);
    if graph.is_empty() {
        return Err(Error::graph_unavailable(
            &paths.dataset,
            "dataset contains no navigable edges",
        ));
    }

    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "routing graph ready"
    );
    Ok(graph)
}

/// Process-wide holder for the routing graph.
///
/// The first caller of [`GraphStore::get`] builds the graph while concurrent
/// callers wait; afterwards every caller shares the same read-only graph. A
/// failed build is not remembered, so the next call tries again.
#[derive(Debug)]
pub struct GraphStore {
    paths: DatasetPaths,
    options: GraphLoadOptions,
    graph: OnceCell<Arc<RoutingGraph>>,
}

impl GraphStore {
    pub fn new(paths: DatasetPaths, options: GraphLoadOptions) -> Self {
        Self {
            paths,
            options,
            graph: OnceCell::new(),
        }
    }

    /// Wrap an already-built graph.
    pub fn from_graph(paths: DatasetPaths, graph: RoutingGraph) -> Self {
        Self {
            paths,
            options: GraphLoadOptions::default(),
            graph: OnceCell::with_value(Arc::new(graph)),
        }
    }

    pub fn paths(&self) -> &DatasetPaths {
        &self.paths
    }

    pub fn is_loaded(&self) -> bool {
        self.graph.get().is_some()
    }

    /// Return the shared graph, building it on first use.
    pub fn get(&self) -> Result<Arc<RoutingGraph>> {
        self.graph
            .get_or_try_init(|| load_graph(&self.paths, &self.options).map(Arc::new))
            .map(Arc::clone)
    }
}

//! KD-tree index for snapping coordinates onto the nearest graph vertex.
//!
//! Vertices are indexed as 3D points on the unit sphere, so nearest-neighbour
//! queries are unaffected by the antimeridian and by longitudes outside
//! `[-180, 180]` (as produced by antimeridian pair adjustment). Euclidean chord
//! length on the unit sphere is monotonic in great-circle distance, so the
//! nearest point by chord is the nearest point along the surface.
//!
//! The immutable tree variant is used because densified network lines contain
//! long runs of vertices sharing one latitude (and hence one `z` coordinate).

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::coords::{unit_vector, Position};
use crate::graph::VertexId;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Nearest-vertex index over a graph's vertex positions.
pub struct VertexIndex {
    tree: Option<ImmutableKdTree<f64, u64, 3, BUCKET_SIZE>>,
}

impl VertexIndex {
    /// Build an index; item `i` refers to `vertices[i]`.
    pub fn build(vertices: &[Position]) -> Self {
        if vertices.is_empty() {
            return Self { tree: None };
        }

        let points: Vec<[f64; 3]> = vertices.iter().copied().map(unit_vector).collect();
        let tree = ImmutableKdTree::new_from_slice(&points);
        debug!(vertices = points.len(), "built vertex index");

        Self { tree: Some(tree) }
    }

    /// Index of the vertex nearest to `position`, if any vertices are indexed.
    pub fn nearest(&self, position: Position) -> Option<VertexId> {
        let tree = self.tree.as_ref()?;
        let neighbour = tree.nearest_one::<SquaredEuclidean>(&unit_vector(position));
        Some(neighbour.item as VertexId)
    }
}

impl std::fmt::Debug for VertexIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexIndex")
            .field("empty", &self.tree.is_none())
            .finish()
    }
}

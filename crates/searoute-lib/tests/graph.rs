mod common;

use std::collections::HashSet;
use std::fs;

use common::{fixture_graph, fixture_path, pos};
use searoute_lib::{load_navigable_lines, prepare_edges, Edge, NavigableLines, RoutingGraph};
use serde_json::json;

type EdgeBits = (u64, u64, u64, u64);

fn edge_set(edges: &[Edge]) -> HashSet<EdgeBits> {
    edges
        .iter()
        .map(|edge| {
            (
                edge.from.longitude.to_bits(),
                edge.from.latitude.to_bits(),
                edge.to.longitude.to_bits(),
                edge.to.latitude.to_bits(),
            )
        })
        .collect()
}

#[test]
fn fixture_decomposes_into_pairs() {
    let lines = load_navigable_lines(&fixture_path()).expect("fixture loads");
    let edges = prepare_edges(&lines);

    // the Point feature is skipped; the MultiLineString contributes two lines
    assert_eq!(lines.len(), 6);
    assert_eq!(edges.len(), lines.point_count() - lines.len());
}

#[test]
fn preparing_pre_split_data_is_idempotent() {
    let lines = load_navigable_lines(&fixture_path()).expect("fixture loads");
    let edges = prepare_edges(&lines);

    let features: Vec<_> = edges
        .iter()
        .map(|edge| {
            json!({
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "LineString", "coordinates": [edge.from, edge.to]}
            })
        })
        .collect();
    let collection = json!({"type": "FeatureCollection", "features": features});

    let dir = tempfile::tempdir().expect("temp dir");
    let split_path = dir.path().join("split.geojson");
    fs::write(&split_path, serde_json::to_vec(&collection).unwrap()).unwrap();

    let split_lines = load_navigable_lines(&split_path).expect("pre-split dataset loads");
    assert!(split_lines.lines.iter().all(|line| line.len() == 2));

    let resplit = prepare_edges(&split_lines);
    assert_eq!(resplit.len(), split_lines.len());
    assert_eq!(edge_set(&resplit), edge_set(&edges));
}

#[test]
fn antimeridian_halves_share_a_vertex() {
    let graph = fixture_graph();
    let (east, _) = graph.nearest_vertex(pos(179.99, 10.0)).unwrap();
    let (west, _) = graph.nearest_vertex(pos(-179.99, 10.0)).unwrap();
    assert_eq!(east, west);
    assert_eq!(graph.neighbours(east).len(), 2);
}

#[test]
fn shared_line_endpoints_are_merged() {
    let graph = fixture_graph();
    let (junction, distance) = graph.nearest_vertex(pos(-6.0, 35.95)).unwrap();
    assert!(distance < 1e-9);
    assert_eq!(graph.neighbours(junction).len(), 2);
}

#[test]
fn graph_from_edges_matches_graph_from_lines() {
    let lines = NavigableLines::new(vec![vec![pos(0.0, 0.0), pos(1.0, 0.0), pos(2.0, 1.0)]]);
    let from_lines = RoutingGraph::from_lines(&lines);
    let from_edges = RoutingGraph::from_edges(&prepare_edges(&lines));

    assert_eq!(from_lines.vertex_count(), from_edges.vertex_count());
    assert_eq!(from_lines.edge_count(), 2);
    assert_eq!(from_edges.edge_count(), 2);
}

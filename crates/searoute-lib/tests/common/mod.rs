#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use searoute_lib::{load_navigable_lines, DatasetPaths, Position, RoutingGraph};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture_path() -> PathBuf {
    fixtures_dir().join("minimal_marnet.geojson")
}

pub fn fixture_graph() -> RoutingGraph {
    let lines = load_navigable_lines(&fixture_path()).expect("fixture dataset loads");
    RoutingGraph::from_lines(&lines)
}

/// Copy the fixture into `dir` so cache files land in a scratch location.
pub fn copy_fixture_to(dir: &Path) -> DatasetPaths {
    let target = dir.join("marnet.geojson");
    fs::copy(fixture_path(), &target).expect("copy fixture dataset");
    DatasetPaths::for_dataset(target)
}

/// Points not lying on the antimeridian, where segment cuts are inserted.
pub fn off_antimeridian(points: &[Position]) -> Vec<Position> {
    points
        .iter()
        .copied()
        .filter(|point| point.longitude.abs() != 180.0)
        .collect()
}

pub fn pos(longitude: f64, latitude: f64) -> Position {
    Position::new(longitude, latitude)
}

pub const NEW_YORK: Position = Position::new(-74.0, 40.7);
pub const PORT_SAID: Position = Position::new(31.2, 30.0);

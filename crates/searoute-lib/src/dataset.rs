use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::cache::cache_path;
use crate::coords::{validate_position, Position};
use crate::error::{Error, Result};

/// Default filename for the navigable-lines dataset.
const DATASET_FILENAME: &str = "marnet.geojson";

/// Environment variable overriding the dataset location.
pub const DATA_DIR_ENV: &str = "SEAROUTE_DATA_DIR";

/// Paths to dataset files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    /// Path to the GeoJSON navigable-lines dataset.
    pub dataset: PathBuf,
    /// Path to the prepared graph cache stored alongside the dataset.
    pub cache: PathBuf,
}

impl DatasetPaths {
    pub fn for_dataset(dataset: PathBuf) -> Self {
        let cache = cache_path(&dataset);
        Self { dataset, cache }
    }
}

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "searoute", "searoute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Locate the navigable-lines dataset.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided (a file, or a directory holding
///    `marnet.geojson`).
/// 2. `SEAROUTE_DATA_DIR` environment variable.
/// 3. Platform-specific project data directory.
///
/// Fails with [`Error::GraphUnavailable`] when the resolved file does not exist.
pub fn resolve_dataset(target: Option<&Path>) -> Result<DatasetPaths> {
    let resolved = if let Some(explicit) = target {
        canonical_dataset_path(explicit)
    } else if let Some(env_path) = env::var_os(DATA_DIR_ENV) {
        canonical_dataset_path(Path::new(&env_path))
    } else {
        default_dataset_path()?
    };

    if !resolved.is_file() {
        return Err(Error::graph_unavailable(&resolved, "dataset file not found"));
    }

    debug!(path = %resolved.display(), "resolved navigable-lines dataset");
    Ok(DatasetPaths::for_dataset(resolved))
}

fn canonical_dataset_path(path: &Path) -> PathBuf {
    if path.is_dir() || path.extension().is_none() {
        return path.join(DATASET_FILENAME);
    }
    path.to_path_buf()
}

/// Raw navigable lines read from a dataset: each line is an ordered list of positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigableLines {
    pub lines: Vec<Vec<Position>>,
}

impl NavigableLines {
    pub fn new(lines: Vec<Vec<Position>>) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of positions across all lines.
    pub fn point_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

/// Parse a GeoJSON FeatureCollection of `LineString`/`MultiLineString` features.
///
/// Features with other geometry types are skipped. `source` is only used in
/// error messages.
pub fn parse_navigable_lines(bytes: &[u8], source: &Path) -> Result<NavigableLines> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)
        .map_err(|e| Error::graph_unavailable(source, format!("invalid GeoJSON: {e}")))?;

    let mut lines = Vec::with_capacity(collection.features.len());
    let mut skipped = 0usize;

    for feature in collection.features {
        match feature.geometry {
            Some(Geometry::LineString { coordinates }) => {
                lines.push(convert_line(&coordinates, source)?);
            }
            Some(Geometry::MultiLineString { coordinates }) => {
                for part in &coordinates {
                    lines.push(convert_line(part, source)?);
                }
            }
            Some(Geometry::Unsupported) | None => skipped += 1,
        }
    }

    debug!(
        lines = lines.len(),
        skipped,
        source = %source.display(),
        "parsed navigable lines"
    );

    Ok(NavigableLines { lines })
}

/// Read and parse a navigable-lines dataset from disk.
pub fn load_navigable_lines(path: &Path) -> Result<NavigableLines> {
    let bytes = read_dataset(path)?;
    parse_navigable_lines(&bytes, path)
}

pub(crate) fn read_dataset(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::graph_unavailable(path, format!("failed to read: {e}")))
}

fn convert_line(coordinates: &[Vec<f64>], source: &Path) -> Result<Vec<Position>> {
    coordinates
        .iter()
        .map(|pair| {
            let (Some(&longitude), Some(&latitude)) = (pair.first(), pair.get(1)) else {
                return Err(Error::graph_unavailable(
                    source,
                    "position with fewer than two components",
                ));
            };
            validate_position(Position::new(longitude, latitude)).map_err(|e| {
                Error::graph_unavailable(source, format!("invalid dataset position: {e}"))
            })
        })
        .collect()
}

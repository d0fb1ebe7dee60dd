//! Persisted form of the prepared (two-point) edge set.
//!
//! Decomposing and re-parsing a large network on every start is wasteful, so
//! the prepared edges are written next to the dataset after the first build.
//! The cache is strictly best-effort: a missing, corrupt or stale file makes
//! the caller fall back to decomposing the raw dataset.
//!
//! # File Format
//!
//! ```text
//! Header (16 bytes):
//!   - Magic: b"SRGC" (4 bytes)
//!   - Version: u8 (1 byte)
//!   - Flags: u8 (1 byte), currently unused
//!   - Edge count: u32 (4 bytes)
//!   - Reserved: 6 bytes
//!
//! Body:
//!   - postcard-serialized PreparedEdges (dataset checksum + edges)
//!   - zstd compressed
//!
//! Footer (32 bytes):
//!   - SHA-256 checksum of compressed body
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::Edge;

/// Magic bytes identifying a prepared graph cache file.
const CACHE_MAGIC: &[u8; 4] = b"SRGC";

/// Current cache format version.
const CACHE_VERSION: u8 = 1;

/// Header size in bytes.
const HEADER_SIZE: usize = 16;

/// Checksum size in bytes (SHA-256).
const CHECKSUM_SIZE: usize = 32;

/// zstd compression level (balanced speed/ratio).
const COMPRESSION_LEVEL: i32 = 3;

/// SHA-256 digest of the raw dataset bytes.
pub type DatasetChecksum = [u8; 32];

/// Decoded cache body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedEdges {
    /// Checksum of the dataset the edges were derived from.
    pub source_checksum: DatasetChecksum,
    pub edges: Vec<Edge>,
}

/// Derive the cache path from a dataset path: `marnet.geojson` -> `marnet.geojson.edges.bin`.
pub fn cache_path(dataset: &Path) -> PathBuf {
    let mut path = dataset.as_os_str().to_owned();
    path.push(".edges.bin");
    PathBuf::from(path)
}

/// Compute the checksum used to detect stale caches.
pub fn dataset_checksum(bytes: &[u8]) -> DatasetChecksum {
    Sha256::digest(bytes).into()
}

/// Serialize prepared edges to `path`.
pub fn save_prepared_edges(
    path: &Path,
    source_checksum: &DatasetChecksum,
    edges: &[Edge],
) -> Result<()> {
    let payload = PreparedEdges {
        source_checksum: *source_checksum,
        edges: edges.to_vec(),
    };

    let serialized = postcard::to_allocvec(&payload).map_err(|e| Error::CacheSerialize {
        message: format!("postcard serialization failed: {}", e),
    })?;

    let compressed = zstd::encode_all(serialized.as_slice(), COMPRESSION_LEVEL).map_err(|e| {
        Error::CacheSerialize {
            message: format!("zstd compression failed: {}", e),
        }
    })?;

    let checksum = Sha256::digest(&compressed);

    let edge_count = u32::try_from(edges.len()).map_err(|_| Error::CacheSerialize {
        message: format!("too many edges for cache format: {}", edges.len()),
    })?;

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(CACHE_MAGIC);
    header[4] = CACHE_VERSION;
    header[6..10].copy_from_slice(&edge_count.to_le_bytes());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&header)?;
    writer.write_all(&compressed)?;
    writer.write_all(&checksum)?;
    writer.flush()?;

    info!(
        path = %path.display(),
        edges = edges.len(),
        compressed_size = compressed.len(),
        "prepared graph cache saved"
    );
    Ok(())
}

/// Load and verify a prepared graph cache.
pub fn load_prepared_edges(path: &Path) -> Result<PreparedEdges> {
    debug!(path = %path.display(), "loading prepared graph cache");

    let load_error = |message: String| Error::CacheLoad {
        path: path.to_path_buf(),
        message,
    };

    let bytes = fs::read(path).map_err(|e| load_error(format!("failed to read file: {}", e)))?;
    if bytes.len() < HEADER_SIZE + CHECKSUM_SIZE {
        return Err(load_error("file too short".to_string()));
    }

    let (header, rest) = bytes.split_at(HEADER_SIZE);
    let (compressed, stored_checksum) = rest.split_at(rest.len() - CHECKSUM_SIZE);

    if &header[0..4] != CACHE_MAGIC {
        return Err(load_error("invalid magic bytes".to_string()));
    }

    let version = header[4];
    if version != CACHE_VERSION {
        return Err(load_error(format!(
            "unsupported version {} (expected {})",
            version, CACHE_VERSION
        )));
    }

    let mut count_bytes = [0u8; 4];
    count_bytes.copy_from_slice(&header[6..10]);
    let edge_count = u32::from_le_bytes(count_bytes) as usize;

    if Sha256::digest(compressed).as_slice() != stored_checksum {
        return Err(load_error(
            "checksum mismatch - file may be corrupted".to_string(),
        ));
    }

    let decompressed = zstd::decode_all(compressed)
        .map_err(|e| load_error(format!("zstd decompression failed: {}", e)))?;

    let prepared: PreparedEdges = postcard::from_bytes(&decompressed)
        .map_err(|e| load_error(format!("postcard deserialization failed: {}", e)))?;

    if prepared.edges.len() != edge_count {
        return Err(load_error(format!(
            "edge count mismatch: header says {}, body has {}",
            edge_count,
            prepared.edges.len()
        )));
    }

    Ok(prepared)
}

/// Load cached edges if the cache exists, verifies, and matches `expected`.
///
/// Any problem is logged and reported as `None` so the caller rebuilds.
pub fn try_load_prepared_edges(path: &Path, expected: &DatasetChecksum) -> Option<Vec<Edge>> {
    if !path.exists() {
        debug!(path = %path.display(), "no prepared graph cache");
        return None;
    }

    match load_prepared_edges(path) {
        Ok(prepared) if prepared.source_checksum == *expected => {
            info!(
                path = %path.display(),
                edges = prepared.edges.len(),
                "loaded prepared graph cache"
            );
            Some(prepared.edges)
        }
        Ok(_) => {
            warn!(
                path = %path.display(),
                "prepared graph cache is stale, will rebuild"
            );
            None
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to load prepared graph cache, will rebuild"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Position;

    fn edges() -> Vec<Edge> {
        vec![
            Edge::new(Position::new(0.0, 0.0), Position::new(1.0, 0.0)),
            Edge::new(Position::new(1.0, 0.0), Position::new(1.0, 1.0)),
        ]
    }

    #[test]
    fn cache_path_appends_suffix() {
        let path = cache_path(Path::new("/data/marnet.geojson"));
        assert_eq!(path, PathBuf::from("/data/marnet.geojson.edges.bin"));
    }

    #[test]
    fn saved_cache_loads_for_matching_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        let checksum = dataset_checksum(b"dataset");

        save_prepared_edges(&path, &checksum, &edges()).unwrap();

        assert_eq!(try_load_prepared_edges(&path, &checksum), Some(edges()));
    }

    #[test]
    fn stale_cache_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");

        save_prepared_edges(&path, &dataset_checksum(b"old"), &edges()).unwrap();

        assert_eq!(
            try_load_prepared_edges(&path, &dataset_checksum(b"new")),
            None
        );
    }

    #[test]
    fn corrupted_body_fails_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        save_prepared_edges(&path, &dataset_checksum(b"dataset"), &edges()).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        bytes[HEADER_SIZE] ^= 0xFF;
        fs::write(&path, bytes).unwrap();

        let error = load_prepared_edges(&path).unwrap_err();
        assert!(error.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn garbage_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");
        fs::write(&path, b"definitely not a cache").unwrap();

        assert!(load_prepared_edges(&path).is_err());
        assert_eq!(
            try_load_prepared_edges(&path, &dataset_checksum(b"dataset")),
            None
        );
    }
}

//! On-disk layout of a saved index.
//!
//! A directory holding `vectors.bin` (row-major little-endian f32, already
//! normalized), `passages.json` (passages in ordinal order) and
//! `manifest.json`. Every file is written to a temp file in the same directory
//! and renamed into place; the manifest goes last, so a directory without a
//! manifest (or with a mismatching checksum) never loads.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use docqa_core::error::{Error, Result};
use docqa_core::types::Passage;

use crate::index::VectorIndex;

pub const FORMAT_VERSION: u32 = 1;
pub const VECTORS_FILE: &str = "vectors.bin";
pub const PASSAGES_FILE: &str = "passages.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub format_version: u32,
    pub dim: usize,
    pub count: usize,
    pub embedder_id: Option<String>,
    /// blake3 of `vectors.bin`
    pub vectors_blake3: String,
    pub created_at: DateTime<Utc>,
}

fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    let target = dir.join(name);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::persistence(&target, e))?;
    tmp.write_all(bytes).map_err(|e| Error::persistence(&target, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::persistence(&target, e))?;
    tmp.persist(&target).map_err(|e| Error::persistence(&target, e.error))?;
    debug!(file = %target.display(), bytes = bytes.len(), "wrote index file");
    Ok(())
}

fn encode_vectors(vectors: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(vectors.len() * 4);
    for x in vectors {
        buf.extend_from_slice(&x.to_le_bytes());
    }
    buf
}

fn decode_vectors(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Read and check only the manifest of a saved index.
pub fn read_manifest(dir: &Path) -> Result<IndexManifest> {
    let path = dir.join(MANIFEST_FILE);
    let raw = fs::read(&path).map_err(|e| Error::persistence(&path, e))?;
    let manifest: IndexManifest = serde_json::from_slice(&raw).map_err(|e| Error::persistence(&path, e))?;
    if manifest.format_version != FORMAT_VERSION {
        return Err(Error::persistence(
            &path,
            format!("unsupported format version {} (expected {FORMAT_VERSION})", manifest.format_version),
        ));
    }
    Ok(manifest)
}

impl VectorIndex {
    /// Persist into `dir` (created if missing). Returns the written manifest.
    pub fn save(&self, dir: &Path) -> Result<IndexManifest> {
        fs::create_dir_all(dir).map_err(|e| Error::persistence(dir, e))?;
        let vector_bytes = encode_vectors(&self.vectors);
        let passages_json = serde_json::to_vec(&self.passages).map_err(|e| Error::persistence(dir.join(PASSAGES_FILE), e))?;
        let manifest = IndexManifest {
            format_version: FORMAT_VERSION,
            dim: self.dim,
            count: self.passages.len(),
            embedder_id: self.embedder_id.clone(),
            vectors_blake3: blake3::hash(&vector_bytes).to_hex().to_string(),
            created_at: Utc::now(),
        };
        let manifest_json = serde_json::to_vec_pretty(&manifest).map_err(|e| Error::persistence(dir.join(MANIFEST_FILE), e))?;

        write_atomic(dir, VECTORS_FILE, &vector_bytes)?;
        write_atomic(dir, PASSAGES_FILE, &passages_json)?;
        write_atomic(dir, MANIFEST_FILE, &manifest_json)?;
        info!(dir = %dir.display(), count = manifest.count, dim = manifest.dim, "saved index");
        Ok(manifest)
    }

    /// Restore an index written by [`VectorIndex::save`].
    pub fn load(dir: &Path) -> Result<Self> {
        let manifest = read_manifest(dir)?;

        let vectors_path = dir.join(VECTORS_FILE);
        if manifest.dim == 0 && manifest.count > 0 {
            return Err(Error::persistence(
                dir.join(MANIFEST_FILE),
                format!("{} passages with dimension 0", manifest.count),
            ));
        }
        let expected_len = manifest
            .count
            .checked_mul(manifest.dim)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                Error::persistence(
                    &vectors_path,
                    format!("manifest size {} x {} overflows", manifest.count, manifest.dim),
                )
            })?;
        let vector_bytes = fs::read(&vectors_path).map_err(|e| Error::persistence(&vectors_path, e))?;
        if vector_bytes.len() != expected_len {
            return Err(Error::persistence(
                &vectors_path,
                format!("expected {expected_len} bytes, found {}", vector_bytes.len()),
            ));
        }
        let checksum = blake3::hash(&vector_bytes).to_hex().to_string();
        if checksum != manifest.vectors_blake3 {
            return Err(Error::persistence(&vectors_path, "checksum mismatch"));
        }

        let passages_path = dir.join(PASSAGES_FILE);
        let raw = fs::read(&passages_path).map_err(|e| Error::persistence(&passages_path, e))?;
        let passages: Vec<Passage> = serde_json::from_slice(&raw).map_err(|e| Error::persistence(&passages_path, e))?;
        if passages.len() != manifest.count {
            return Err(Error::persistence(
                &passages_path,
                format!("manifest lists {} passages, file has {}", manifest.count, passages.len()),
            ));
        }

        info!(dir = %dir.display(), count = manifest.count, dim = manifest.dim, "loaded index");
        Ok(Self { dim: manifest.dim, embedder_id: manifest.embedder_id, vectors: decode_vectors(&vector_bytes), passages })
    }
}

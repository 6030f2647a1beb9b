//! Flat embedding index with exact squared-L2 search.
//!
//! The index is a single table of [`IndexRow`]s, so a vector can never drift
//! away from its text and metadata. It is built once from a fully embedded
//! chunk set and is read-only afterwards.
//!
//! # On-disk layout
//!
//! ```text
//! <dir>/vectors.bin    ntotal × D little-endian f32, row-major, no header
//! <dir>/metadata.json  {"dimension": D, "vectors_sha256": "...", "texts": [...], "metadatas": [...]}
//! ```
//!
//! Both artifacts are serialised in memory first, written to `*.tmp`
//! siblings, then renamed into place one after the other. The two renames
//! are not atomic as a pair, so `metadata.json` records the SHA-256 of the
//! vectors it was written with; a load that observes one new and one old
//! artifact fails as corrupt instead of mixing them.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{EngineError, Result};
use crate::models::{Chunk, ChunkMetadata, SearchHit};

pub const VECTORS_FILE: &str = "vectors.bin";
pub const METADATA_FILE: &str = "metadata.json";

/// One indexed chunk: its vector, text, and source metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingIndex {
    dimension: usize,
    rows: Vec<IndexRow>,
}

#[derive(Serialize, Deserialize)]
struct MetadataFile {
    dimension: usize,
    /// SHA-256 of the `vectors.bin` this metadata was written with.
    vectors_sha256: String,
    texts: Vec<String>,
    metadatas: Vec<ChunkMetadata>,
}

impl EmbeddingIndex {
    /// Build an index from embedded chunks, preserving their order.
    ///
    /// Fails with [`EngineError::Schema`] when `chunks` is empty, a chunk has
    /// no embedding, or the embeddings disagree on dimension.
    pub fn build(chunks: &[Chunk]) -> Result<Self> {
        let first = chunks
            .first()
            .ok_or_else(|| EngineError::schema("cannot build an index from zero chunks"))?;
        let dimension = first.embedding.as_ref().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(EngineError::schema(format!(
                "chunk {} of {} has no embedding",
                first.metadata.chunk_id, first.metadata.file_name
            )));
        }

        let rows = chunks
            .iter()
            .map(|chunk| {
                let vector = chunk.embedding.as_ref().ok_or_else(|| {
                    EngineError::schema(format!(
                        "chunk {} of {} has no embedding",
                        chunk.metadata.chunk_id, chunk.metadata.file_name
                    ))
                })?;
                if vector.len() != dimension {
                    return Err(EngineError::schema(format!(
                        "chunk {} has dimension {}, expected {}",
                        chunk.metadata.chunk_id,
                        vector.len(),
                        dimension
                    )));
                }
                if !all_finite(vector) {
                    return Err(EngineError::schema(format!(
                        "chunk {} of {} has a non-finite embedding value",
                        chunk.metadata.chunk_id, chunk.metadata.file_name
                    )));
                }
                Ok(IndexRow {
                    vector: vector.clone(),
                    text: chunk.text.clone(),
                    metadata: chunk.metadata.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { dimension, rows })
    }

    /// Build and persist in one step.
    pub fn build_and_persist(chunks: &[Chunk], dir: &Path) -> Result<Self> {
        let index = Self::build(chunks)?;
        index.persist(dir)?;
        tracing::info!(
            rows = index.len(),
            dimension = index.dimension,
            dir = %dir.display(),
            "index built"
        );
        Ok(index)
    }

    /// Write both artifacts into `dir`.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(|e| EngineError::io(dir, e))?;

        let mut vectors = Vec::with_capacity(self.rows.len() * self.dimension * 4);
        for row in &self.rows {
            vectors.extend_from_slice(&vec_to_blob(&row.vector));
        }
        let metadata = MetadataFile {
            dimension: self.dimension,
            vectors_sha256: sha256_hex(&vectors),
            texts: self.rows.iter().map(|r| r.text.clone()).collect(),
            metadatas: self.rows.iter().map(|r| r.metadata.clone()).collect(),
        };
        let metadata_path = dir.join(METADATA_FILE);
        let metadata = serde_json::to_vec(&metadata).map_err(|source| {
            EngineError::Serialization {
                path: metadata_path.clone(),
                source,
            }
        })?;

        let vectors_staged = stage(&dir.join(VECTORS_FILE), &vectors)?;
        let metadata_staged = match stage(&metadata_path, &metadata) {
            Ok(staged) => staged,
            Err(e) => {
                let _ = std::fs::remove_file(&vectors_staged.0);
                return Err(e);
            }
        };
        for (tmp, target) in [vectors_staged, metadata_staged] {
            std::fs::rename(&tmp, &target).map_err(|e| EngineError::io(&target, e))?;
        }
        Ok(())
    }

    /// Load an index persisted by [`EmbeddingIndex::persist`].
    pub fn load(dir: &Path) -> Result<Self> {
        let vectors_path = dir.join(VECTORS_FILE);
        let metadata_path = dir.join(METADATA_FILE);
        for path in [&vectors_path, &metadata_path] {
            if !path.is_file() {
                return Err(EngineError::NotFound { path: path.clone() });
            }
        }

        let raw = std::fs::read(&metadata_path).map_err(|e| EngineError::io(&metadata_path, e))?;
        let metadata: MetadataFile =
            serde_json::from_slice(&raw).map_err(|source| EngineError::Serialization {
                path: metadata_path.clone(),
                source,
            })?;
        let blob = std::fs::read(&vectors_path).map_err(|e| EngineError::io(&vectors_path, e))?;

        if sha256_hex(&blob) != metadata.vectors_sha256 {
            return Err(EngineError::corrupt(
                dir,
                "vectors.bin does not match the digest recorded in metadata.json",
            ));
        }

        let dimension = metadata.dimension;
        if dimension == 0 {
            if blob.is_empty() && metadata.texts.is_empty() && metadata.metadatas.is_empty() {
                return Ok(Self::default());
            }
            return Err(EngineError::corrupt(dir, "dimension is 0 but rows are present"));
        }
        let row_bytes = dimension * 4;
        if blob.len() % row_bytes != 0 {
            return Err(EngineError::corrupt(
                &vectors_path,
                format!("{} bytes is not a multiple of {} (dimension {})", blob.len(), row_bytes, dimension),
            ));
        }
        let ntotal = blob.len() / row_bytes;
        if ntotal != metadata.texts.len() || ntotal != metadata.metadatas.len() {
            return Err(EngineError::corrupt(
                dir,
                format!(
                    "{} vectors but {} texts and {} metadatas",
                    ntotal,
                    metadata.texts.len(),
                    metadata.metadatas.len()
                ),
            ));
        }

        let rows = blob
            .chunks_exact(row_bytes)
            .zip(metadata.texts)
            .zip(metadata.metadatas)
            .enumerate()
            .map(|(i, ((bytes, text), metadata))| {
                let vector = blob_to_vec(bytes);
                if !all_finite(&vector) {
                    return Err(EngineError::corrupt(
                        &vectors_path,
                        format!("row {} holds a non-finite value", i),
                    ));
                }
                Ok(IndexRow {
                    vector,
                    text,
                    metadata,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let index = Self { dimension, rows };
        tracing::info!(rows = index.len(), dimension, dir = %dir.display(), "index loaded");
        Ok(index)
    }

    /// Return up to `k` rows ranked by ascending squared L2 distance.
    ///
    /// `k` is clamped to the number of rows; an empty index or `k <= 0`
    /// yields an empty list. Ties keep insertion order.
    pub fn search(&self, query: &[f32], k: i64) -> Result<Vec<SearchHit>> {
        if self.rows.is_empty() || k <= 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(EngineError::schema(format!(
                "query has dimension {}, index has {}",
                query.len(),
                self.dimension
            )));
        }
        if !all_finite(query) {
            return Err(EngineError::schema("query vector has a non-finite value"));
        }

        let mut scored: Vec<(usize, f32)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i, squared_l2(query, &row.vector)))
            .collect();
        // Stable: equal distances stay in insertion order. NaN sorts last
        // whatever its sign bit.
        scored.sort_by(|a, b| a.1.is_nan().cmp(&b.1.is_nan()).then(a.1.total_cmp(&b.1)));
        scored.truncate((k as usize).min(self.rows.len()));

        Ok(scored
            .into_iter()
            .map(|(i, distance)| SearchHit {
                text: self.rows[i].text.clone(),
                metadata: self.rows[i].metadata.clone(),
                distance,
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn rows(&self) -> &[IndexRow] {
        &self.rows
    }

    /// Stored rows as embedded chunks, in insertion order.
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        self.rows.iter().map(|row| Chunk {
            text: row.text.clone(),
            metadata: row.metadata.clone(),
            embedding: Some(row.vector.clone()),
        })
    }
}

fn stage(target: &Path, bytes: &[u8]) -> Result<(PathBuf, PathBuf)> {
    let mut tmp = target.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, bytes).map_err(|e| EngineError::io(&tmp, e))?;
    Ok((tmp, target.to_path_buf()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn all_finite(vector: &[f32]) -> bool {
    vector.iter().all(|x| x.is_finite())
}

/// Squared Euclidean distance. Callers guarantee equal lengths.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Encode a float vector as little-endian f32 bytes.
///
/// ```rust
/// use tcgen::index::{vec_to_blob, blob_to_vec};
///
/// let v = vec![1.0f32, -2.5, 3.125];
/// let blob = vec_to_blob(&v);
/// assert_eq!(blob.len(), 12); // 3 × 4 bytes
/// assert_eq!(blob_to_vec(&blob), v);
/// ```
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode little-endian f32 bytes back into a float vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// A shareable index handle: many concurrent searches, one rebuild at a time.
///
/// A rebuild builds and persists the new index without holding the lock,
/// then swaps it in under the write lock, so in-flight searches finish
/// against the old index and later ones see the new one.
#[derive(Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<EmbeddingIndex>>,
    rebuild_guard: Arc<Mutex<()>>,
}

impl SharedIndex {
    pub fn new(index: EmbeddingIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
            rebuild_guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn search(&self, query: &[f32], k: i64) -> Result<Vec<SearchHit>> {
        self.read().search(query, k)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, EmbeddingIndex> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build from `chunks`, persist into `dir`, and swap in the result.
    pub fn rebuild(&self, chunks: &[Chunk], dir: &Path) -> Result<()> {
        let _serial = self
            .rebuild_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let fresh = EmbeddingIndex::build_and_persist(chunks, dir)?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        Ok(())
    }
}

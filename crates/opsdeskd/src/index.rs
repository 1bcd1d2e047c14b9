//! Tenant-partitioned SOP index.
//!
//! The engine talks to the `SopIndex` trait; `InMemorySopIndex` is the
//! bundled nearest-neighbor store. A persistent/pgvector-backed store slots
//! in behind the same trait.

use crate::embedding::cosine_similarity;
use async_trait::async_trait;
use opsdesk_common::{EvidenceItem, SopChunk, TriageError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A chunk paired with its embedding. The vector never leaves the index.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: SopChunk,
    pub vector: Vec<f32>,
}

/// Per-tenant index statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantStats {
    pub total_sops: usize,
    pub total_chunks: usize,
    pub categories: Vec<String>,
}

#[async_trait]
pub trait SopIndex: Send + Sync {
    /// Replace all chunks of `(tenant_id, title)` with the given set.
    /// Atomic with respect to concurrent queries: readers see the old or
    /// the new chunk set for the tenant, never a mix.
    async fn upsert(
        &self,
        tenant_id: &str,
        title: &str,
        chunks: Vec<IndexedChunk>,
    ) -> Result<usize, TriageError>;

    /// Remove every chunk for a tenant, returning the count removed.
    async fn delete_tenant(&self, tenant_id: &str) -> Result<usize, TriageError>;

    /// Ranked similarity query. Category filter applies before ranking;
    /// the floor is inclusive; an unknown tenant yields an empty result.
    /// Store faults surface as `TriageError::RetrievalUnavailable`.
    async fn query(
        &self,
        tenant_id: &str,
        query_vector: &[f32],
        top_k: usize,
        category_filter: Option<&str>,
        similarity_floor: f32,
    ) -> Result<Vec<EvidenceItem>, TriageError>;

    /// SOP/chunk/category counts for one tenant.
    async fn stats(&self, tenant_id: &str) -> Result<TenantStats, TriageError>;
}

/// In-memory store, sharded by tenant behind one `RwLock`. Upsert and
/// delete take the write lock for their whole critical section, which
/// gives queries the atomic-swap guarantee.
#[derive(Default)]
pub struct InMemorySopIndex {
    shards: RwLock<HashMap<String, Vec<Arc<IndexedChunk>>>>,
}

impl InMemorySopIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SopIndex for InMemorySopIndex {
    async fn upsert(
        &self,
        tenant_id: &str,
        title: &str,
        chunks: Vec<IndexedChunk>,
    ) -> Result<usize, TriageError> {
        let count = chunks.len();
        let mut shards = self
            .shards
            .write()
            .map_err(|_| TriageError::RetrievalUnavailable("index lock poisoned".into()))?;
        let shard = shards.entry(tenant_id.to_string()).or_default();
        shard.retain(|c| c.chunk.title != title);
        shard.extend(chunks.into_iter().map(Arc::new));
        debug!(tenant_id, title, count, "upserted SOP chunks");
        Ok(count)
    }

    async fn delete_tenant(&self, tenant_id: &str) -> Result<usize, TriageError> {
        let mut shards = self
            .shards
            .write()
            .map_err(|_| TriageError::RetrievalUnavailable("index lock poisoned".into()))?;
        let removed = shards.remove(tenant_id).map(|s| s.len()).unwrap_or(0);
        debug!(tenant_id, removed, "deleted tenant SOPs");
        Ok(removed)
    }

    async fn query(
        &self,
        tenant_id: &str,
        query_vector: &[f32],
        top_k: usize,
        category_filter: Option<&str>,
        similarity_floor: f32,
    ) -> Result<Vec<EvidenceItem>, TriageError> {
        let shards = self
            .shards
            .read()
            .map_err(|_| TriageError::RetrievalUnavailable("index lock poisoned".into()))?;

        let shard = match shards.get(tenant_id) {
            Some(s) => s,
            None => return Ok(Vec::new()),
        };

        let mut scored: Vec<EvidenceItem> = shard
            .iter()
            .filter(|c| match category_filter {
                Some(cat) => c.chunk.category == cat,
                None => true,
            })
            .map(|c| EvidenceItem {
                chunk: c.chunk.clone(),
                similarity: cosine_similarity(query_vector, &c.vector),
            })
            .filter(|e| e.similarity >= similarity_floor)
            .collect();

        // Descending similarity; ties by chunk_index then sop_id so results
        // are stable across runs.
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.chunk_index.cmp(&b.chunk.chunk_index))
                .then_with(|| a.chunk.sop_id.cmp(&b.chunk.sop_id))
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn stats(&self, tenant_id: &str) -> Result<TenantStats, TriageError> {
        let shards = self
            .shards
            .read()
            .map_err(|_| TriageError::RetrievalUnavailable("index lock poisoned".into()))?;
        let shard = match shards.get(tenant_id) {
            Some(s) => s,
            None => {
                return Ok(TenantStats {
                    total_sops: 0,
                    total_chunks: 0,
                    categories: Vec::new(),
                })
            }
        };

        let mut titles: Vec<&str> = shard.iter().map(|c| c.chunk.title.as_str()).collect();
        titles.sort_unstable();
        titles.dedup();

        let mut categories: Vec<String> =
            shard.iter().map(|c| c.chunk.category.clone()).collect();
        categories.sort_unstable();
        categories.dedup();

        Ok(TenantStats {
            total_sops: titles.len(),
            total_chunks: shard.len(),
            categories,
        })
    }
}

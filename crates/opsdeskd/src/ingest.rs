//! SOP ingestion pipeline: chunk, embed, upsert as one logical unit.

use crate::chunker::Chunker;
use crate::embedding::Embedder;
use crate::index::{IndexedChunk, SopIndex};
use opsdesk_common::{SopChunk, SopDocument, TriageError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Batch ingestion summary. Item failures are reported, not fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub total_sops: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_chunks: usize,
    /// (title, reason) per failed item
    pub failures: Vec<(String, String)>,
}

pub struct SopIngestor {
    chunker: Chunker,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn SopIndex>,
}

impl SopIngestor {
    pub fn new(chunker: Chunker, embedder: Arc<dyn Embedder>, index: Arc<dyn SopIndex>) -> Self {
        Self {
            chunker,
            embedder,
            index,
        }
    }

    /// Ingest one SOP document, returning the number of chunks stored.
    pub async fn ingest_sop(&self, doc: &SopDocument) -> Result<usize, TriageError> {
        if doc.tenant_id.trim().is_empty() {
            return Err(TriageError::InvalidDocument(
                "SOP document has no tenant_id".to_string(),
            ));
        }

        let texts = self.chunker.chunk(&doc.content);
        let sop_id = slugify(&doc.title);

        let mut chunks = Vec::with_capacity(texts.len());
        for (chunk_index, text) in texts.into_iter().enumerate() {
            let vector = self.embedder.embed(&text).await?;
            chunks.push(IndexedChunk {
                chunk: SopChunk {
                    sop_id: sop_id.clone(),
                    tenant_id: doc.tenant_id.clone(),
                    title: doc.title.clone(),
                    category: doc.category.clone(),
                    chunk_index,
                    text,
                    tags: doc.tags.clone(),
                    metadata: doc.metadata.clone(),
                },
                vector,
            });
        }

        let count = self.index.upsert(&doc.tenant_id, &doc.title, chunks).await?;
        info!(
            tenant_id = %doc.tenant_id,
            title = %doc.title,
            chunks = count,
            "ingested SOP"
        );
        Ok(count)
    }

    /// Ingest a batch of SOPs. A failing item is recorded in the report and
    /// never aborts its siblings.
    pub async fn ingest_batch(&self, docs: &[SopDocument]) -> IngestReport {
        let mut report = IngestReport {
            total_sops: docs.len(),
            ..Default::default()
        };

        for doc in docs {
            match self.ingest_sop(doc).await {
                Ok(chunks) => {
                    report.successful += 1;
                    report.total_chunks += chunks;
                }
                Err(e) => {
                    warn!(title = %doc.title, error = %e, "SOP ingestion failed");
                    report.failed += 1;
                    report.failures.push((doc.title.clone(), e.to_string()));
                }
            }
        }

        report
    }

    /// Remove every SOP for a tenant. Returns the chunk count removed.
    pub async fn delete_tenant(&self, tenant_id: &str) -> Result<usize, TriageError> {
        self.index.delete_tenant(tenant_id).await
    }
}

/// Stable SOP identity derived from the title, so ranking tie-breaks do not
/// depend on insertion order.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use crate::index::InMemorySopIndex;
    use async_trait::async_trait;
    use opsdesk_common::ChunkingSettings;
    use serde_json::json;

    fn doc(tenant: &str, title: &str, content: &str) -> SopDocument {
        SopDocument {
            tenant_id: tenant.to_string(),
            title: title.to_string(),
            category: "misc".to_string(),
            tags: vec!["test".to_string()],
            metadata: json!({"source": "unit-test"}),
            content: content.to_string(),
        }
    }

    fn ingestor(index: Arc<InMemorySopIndex>) -> SopIngestor {
        SopIngestor::new(
            Chunker::from_settings(&ChunkingSettings::default()),
            Arc::new(HashEmbedder::default()),
            index,
        )
    }

    #[test]
    fn slugify_is_stable_and_clean() {
        assert_eq!(slugify("Password Reset Procedure"), "password-reset-procedure");
        assert_eq!(slugify("  VPN / MFA Setup!! "), "vpn-mfa-setup");
    }

    #[tokio::test]
    async fn ingest_assigns_dense_chunk_indices() {
        let index = Arc::new(InMemorySopIndex::new());
        let ing = ingestor(index.clone());
        let long = (0..12)
            .map(|i| format!("Paragraph number {} with some procedure text in it.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let count = ing.ingest_sop(&doc("t1", "Long SOP", &long)).await.unwrap();
        assert!(count > 1);

        let stats = index.stats("t1").await.unwrap();
        assert_eq!(stats.total_chunks, count);
        assert_eq!(stats.total_sops, 1);
    }

    #[tokio::test]
    async fn reingest_replaces_not_duplicates() {
        let index = Arc::new(InMemorySopIndex::new());
        let ing = ingestor(index.clone());
        ing.ingest_sop(&doc("t1", "Doc", "short body")).await.unwrap();
        ing.ingest_sop(&doc("t1", "Doc", "replacement body")).await.unwrap();
        let stats = index.stats("t1").await.unwrap();
        assert_eq!(stats.total_sops, 1);
        assert_eq!(stats.total_chunks, 1);
    }

    #[tokio::test]
    async fn batch_reports_per_item_failures() {
        struct FlakyEmbedder;

        #[async_trait]
        impl Embedder for FlakyEmbedder {
            async fn embed(&self, text: &str) -> Result<Vec<f32>, TriageError> {
                if text.contains("poison") {
                    Err(TriageError::Embedding("model refused".to_string()))
                } else {
                    Ok(vec![1.0, 0.0])
                }
            }

            fn dimension(&self) -> usize {
                2
            }
        }

        let index = Arc::new(InMemorySopIndex::new());
        let ing = SopIngestor::new(
            Chunker::from_settings(&ChunkingSettings::default()),
            Arc::new(FlakyEmbedder),
            index.clone(),
        );

        let report = ing
            .ingest_batch(&[
                doc("t1", "Good One", "fine body"),
                doc("t1", "Bad One", "poison body"),
                doc("t1", "Good Two", "another fine body"),
            ])
            .await;

        assert_eq!(report.total_sops, 3);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "Bad One");

        // siblings landed despite the failure
        let stats = index.stats("t1").await.unwrap();
        assert_eq!(stats.total_sops, 2);
    }

    #[tokio::test]
    async fn empty_content_yields_zero_chunks_not_error() {
        let index = Arc::new(InMemorySopIndex::new());
        let ing = ingestor(index);
        let count = ing.ingest_sop(&doc("t1", "Empty", "   \n\n ")).await.unwrap();
        assert_eq!(count, 0);
    }
}

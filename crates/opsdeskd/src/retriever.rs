//! SOP evidence retriever.
//!
//! Category-first hybrid search when the classified intent maps to a known
//! SOP category, unfiltered semantic search otherwise. The asymmetric
//! floors are deliberate: a category match already narrows relevance, so
//! weaker semantic matches are acceptable there; without a category the
//! match must stand on similarity alone.

use crate::embedding::Embedder;
use crate::index::SopIndex;
use opsdesk_common::{Classification, EvidenceItem, RetrievalSettings, Ticket, TriageError};
use std::sync::Arc;
use tracing::debug;

pub struct Retriever {
    index: Arc<dyn SopIndex>,
    embedder: Arc<dyn Embedder>,
    settings: RetrievalSettings,
}

impl Retriever {
    pub fn new(
        index: Arc<dyn SopIndex>,
        embedder: Arc<dyn Embedder>,
        settings: RetrievalSettings,
    ) -> Self {
        Self {
            index,
            embedder,
            settings,
        }
    }

    /// Retrieve ranked evidence for a ticket, scoped to its tenant.
    /// Side-effect free: repeated calls with the same ticket are equivalent.
    pub async fn retrieve(
        &self,
        ticket: &Ticket,
        classification: &Classification,
    ) -> Result<Vec<EvidenceItem>, TriageError> {
        let query = ticket.query_text();
        let vector = self.embedder.embed(&query).await?;

        let (category, top_k, floor) = match classification.intent.category() {
            Some(cat) => (
                Some(cat),
                self.settings.category_top_k,
                self.settings.category_floor,
            ),
            None => (None, self.settings.general_top_k, self.settings.general_floor),
        };

        let evidence = self
            .index
            .query(&ticket.tenant_id, &vector, top_k, category, floor)
            .await?;

        debug!(
            tenant_id = %ticket.tenant_id,
            intent = %classification.intent,
            category = category.unwrap_or("-"),
            results = evidence.len(),
            "retrieved SOP evidence"
        );
        Ok(evidence)
    }
}

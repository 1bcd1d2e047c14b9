//! Decision engine orchestrator.
//!
//! Classification → retrieval → planning, one direction, tenant id threaded
//! unchanged through every call. Retrieval is best-effort input to planning:
//! an unavailable index degrades to empty evidence, it never fails the
//! decision and never changes the plan or its risk.

use crate::classifier::HybridClassifier;
use crate::planner;
use crate::retriever::Retriever;
use opsdesk_common::{Decision, Ticket, TriageError};
use tracing::{info, warn};

pub struct DecisionEngine {
    classifier: HybridClassifier,
    retriever: Retriever,
}

impl DecisionEngine {
    pub fn new(classifier: HybridClassifier, retriever: Retriever) -> Self {
        Self {
            classifier,
            retriever,
        }
    }

    /// Triage one ticket. Malformed input fails fast; everything downstream
    /// degrades rather than fails, so a well-formed ticket always gets a
    /// decision.
    pub async fn decide(&self, ticket: &Ticket) -> Result<Decision, TriageError> {
        ticket.validate()?;

        let classification = self.classifier.classify(&ticket.query_text()).await;

        let evidence = match self.retriever.retrieve(ticket, &classification).await {
            Ok(evidence) => evidence,
            Err(e) if e.is_recoverable() => {
                warn!(
                    ticket_id = %ticket.id,
                    tenant_id = %ticket.tenant_id,
                    error = %e,
                    "retrieval degraded, planning without evidence"
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let decision = planner::synthesize(&ticket.id, &classification, &evidence);
        info!(
            ticket_id = %ticket.id,
            tenant_id = %ticket.tenant_id,
            intent = %decision.intent,
            confidence = classification.confidence,
            steps = decision.steps.len(),
            risk = %decision.risk_level,
            requires_approval = decision.requires_human_approval,
            "decision produced"
        );
        Ok(decision)
    }
}

//! Hybrid ticket classifier.
//!
//! External scorer first, deterministic keyword rules as the guaranteed
//! fallback. The engine is never without a classification: a flaky or
//! absent scorer degrades to deterministic behavior, not to a failure.

pub mod keyword;
pub mod scorer;

use keyword::KeywordClassifier;
use opsdesk_common::{Classification, ClassifierSettings, Intent};
use scorer::ExternalScorer;
use std::sync::Arc;
use tracing::debug;

/// Raw strategy output: intent plus confidence, before automation policy
/// is applied. Both strategies produce this; neither asserts automatability.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredIntent {
    pub intent: Intent,
    pub confidence: f64,
    pub rationale: String,
}

/// Intents the platform is allowed to automate when confidence is high
/// enough. Everything else always goes to a human.
const AUTOMATABLE_INTENTS: &[Intent] = &[
    Intent::PasswordReset,
    Intent::SystemRestart,
    Intent::BackupVerification,
    Intent::PrinterIssue,
];

pub struct HybridClassifier {
    rules: KeywordClassifier,
    scorer: Option<Arc<dyn ExternalScorer>>,
    settings: ClassifierSettings,
}

impl HybridClassifier {
    pub fn new(settings: ClassifierSettings, scorer: Option<Arc<dyn ExternalScorer>>) -> Self {
        Self {
            rules: KeywordClassifier,
            scorer,
            settings,
        }
    }

    /// Deterministic-only classifier (no external scorer configured).
    pub fn deterministic(settings: ClassifierSettings) -> Self {
        Self::new(settings, None)
    }

    pub async fn classify(&self, text: &str) -> Classification {
        let external = match &self.scorer {
            Some(s) => s.score(text).await,
            None => None,
        };

        let scored = match external {
            Some(ext) if ext.confidence >= self.settings.low_confidence_threshold => ext,
            Some(weak) => {
                // Weak-but-present external signal: fall back, but keep both
                // outcomes visible in the rationale.
                debug!(
                    intent = %weak.intent,
                    confidence = weak.confidence,
                    "external scorer below threshold, using deterministic fallback"
                );
                let det = self.rules.classify(text);
                let rationale = format!(
                    "External scorer too weak ({} at {:.2}); deterministic fallback: {}",
                    weak.intent, weak.confidence, det.rationale
                );
                ScoredIntent { rationale, ..det }
            }
            None => self.rules.classify(text),
        };

        self.finalize(scored)
    }

    /// Apply the automation policy and the confidence contract.
    fn finalize(&self, scored: ScoredIntent) -> Classification {
        let confidence = scored.confidence.clamp(0.0, 1.0);
        let is_automatable = AUTOMATABLE_INTENTS.contains(&scored.intent)
            && confidence >= self.settings.automatable_min_confidence;
        Classification {
            intent: scored.intent,
            confidence,
            sub_category: None,
            is_automatable,
            rationale: scored.rationale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Scripted scorer for tests.
    struct FakeScorer {
        reply: Option<ScoredIntent>,
    }

    #[async_trait]
    impl ExternalScorer for FakeScorer {
        async fn score(&self, _text: &str) -> Option<ScoredIntent> {
            self.reply.clone()
        }
    }

    fn settings() -> ClassifierSettings {
        ClassifierSettings::default()
    }

    #[tokio::test]
    async fn strong_external_result_is_used_as_is() {
        let scorer = Arc::new(FakeScorer {
            reply: Some(ScoredIntent {
                intent: Intent::EmailIssue,
                confidence: 0.8,
                rationale: "model says email".to_string(),
            }),
        });
        let c = HybridClassifier::new(settings(), Some(scorer));
        let out = c.classify("mailbox is broken").await;
        assert_eq!(out.intent, Intent::EmailIssue);
        assert!((out.confidence - 0.8).abs() < 1e-9);
        assert_eq!(out.rationale, "model says email");
    }

    #[tokio::test]
    async fn weak_external_result_falls_back_with_annotated_rationale() {
        let scorer = Arc::new(FakeScorer {
            reply: Some(ScoredIntent {
                intent: Intent::NetworkConnectivity,
                confidence: 0.4,
                rationale: "unsure".to_string(),
            }),
        });
        let c = HybridClassifier::new(settings(), Some(scorer));
        let out = c.classify("forgot my password").await;
        assert_eq!(out.intent, Intent::PasswordReset);
        assert!(out.rationale.contains("too weak"));
        assert!(out.rationale.contains("0.40"));
        assert!(out.rationale.contains("deterministic fallback"));
    }

    #[tokio::test]
    async fn absent_scorer_degrades_to_deterministic() {
        let scorer = Arc::new(FakeScorer { reply: None });
        let c = HybridClassifier::new(settings(), Some(scorer));
        let out = c.classify("forgot my password").await;
        assert_eq!(out.intent, Intent::PasswordReset);
        assert!(!out.rationale.contains("too weak"));
    }

    #[tokio::test]
    async fn out_of_range_confidence_is_clamped() {
        let scorer = Arc::new(FakeScorer {
            reply: Some(ScoredIntent {
                intent: Intent::PasswordReset,
                confidence: 1.7,
                rationale: "overconfident".to_string(),
            }),
        });
        let c = HybridClassifier::new(settings(), Some(scorer));
        let out = c.classify("password").await;
        assert!((out.confidence - 1.0).abs() < 1e-9);
        assert!(out.is_automatable);
    }

    #[tokio::test]
    async fn automatable_needs_both_intent_and_confidence() {
        let c = HybridClassifier::deterministic(settings());

        // PasswordReset at >= 0.75: automatable
        let strong = c.classify("forgot my password").await;
        assert!(strong.is_automatable);

        // VpnAccess is not in the automatable set even at high confidence
        let vpn = c.classify("need vpn for work from home").await;
        assert_eq!(vpn.intent, Intent::VpnAccess);
        assert!(!vpn.is_automatable);

        // Unknown is never automatable
        let unknown = c.classify("zzzzqqqq").await;
        assert_eq!(unknown.intent, Intent::Unknown);
        assert!(!unknown.is_automatable);
    }
}

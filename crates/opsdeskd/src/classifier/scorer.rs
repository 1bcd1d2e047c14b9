//! External scorer port and HTTP client.
//!
//! The scorer is optional and best-effort: absence is the only failure
//! signal the decision engine understands. Transport errors, timeouts,
//! malformed JSON and unrecognized labels all degrade to `None`.

use super::ScoredIntent;
use async_trait::async_trait;
use opsdesk_common::{Intent, ScorerSettings};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait ExternalScorer: Send + Sync {
    /// Score one ticket text, or return `None` when no signal is available.
    async fn score(&self, text: &str) -> Option<ScoredIntent>;
}

/// Wire shape expected back from the scorer model.
#[derive(Debug, Deserialize)]
struct ScorerReply {
    intent: String,
    confidence: f64,
    #[serde(default)]
    rationale: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// OpenAI-compatible chat client used as the external scorer.
pub struct HttpScorer {
    settings: ScorerSettings,
    client: reqwest::Client,
}

impl HttpScorer {
    pub fn new(settings: ScorerSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { settings, client }
    }

    fn build_prompt(text: &str) -> String {
        let labels: Vec<&str> = [
            Intent::PasswordReset,
            Intent::SystemRestart,
            Intent::VpnAccess,
            Intent::BackupVerification,
            Intent::SoftwareInstallation,
            Intent::PrinterIssue,
            Intent::EmailIssue,
            Intent::NetworkConnectivity,
            Intent::Unknown,
        ]
        .iter()
        .map(|i| i.as_str())
        .collect();

        format!(
            "Classify the following IT support ticket into one of these intents: {}.\n\
             Ticket:\n\"\"\"{}\"\"\"\n\
             Respond ONLY with JSON: {{\"intent\": \"...\", \"confidence\": 0.0, \"rationale\": \"...\"}}",
            labels.join(", "),
            text
        )
    }

    async fn call(&self, text: &str) -> Option<ScoredIntent> {
        let body = json!({
            "model": self.settings.model,
            "temperature": 0.0,
            "messages": [
                {"role": "system", "content": "You are an IT service desk triage assistant."},
                {"role": "user", "content": Self::build_prompt(text)},
            ],
        });

        let mut request = self.client.post(&self.settings.endpoint).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let timeout = Duration::from_secs(self.settings.timeout_secs);
        let response = match tokio::time::timeout(timeout, request.send()).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => {
                debug!(error = %e, "scorer request failed");
                return None;
            }
            Err(_) => {
                debug!(timeout_secs = self.settings.timeout_secs, "scorer timed out");
                return None;
            }
        };

        let chat: ChatResponse = match response.json().await {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "scorer response was not valid JSON");
                return None;
            }
        };

        let content = chat.choices.first().map(|c| c.message.content.as_str())?;
        parse_reply(content)
    }
}

/// Extract the `{intent, confidence, rationale}` payload from model output.
/// Tolerates surrounding prose by scanning for the outermost JSON object.
fn parse_reply(content: &str) -> Option<ScoredIntent> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    let reply: ScorerReply = serde_json::from_str(&content[start..=end]).ok()?;
    let intent = match Intent::from_label(&reply.intent) {
        Some(i) => i,
        None => {
            debug!(label = %reply.intent, "scorer returned unrecognized intent label");
            return None;
        }
    };
    Some(ScoredIntent {
        intent,
        confidence: reply.confidence,
        rationale: if reply.rationale.is_empty() {
            "external scorer decision".to_string()
        } else {
            reply.rationale
        },
    })
}

#[async_trait]
impl ExternalScorer for HttpScorer {
    async fn score(&self, text: &str) -> Option<ScoredIntent> {
        if !self.settings.enabled {
            return None;
        }
        self.call(text).await
    }
}

//! Core wire types: tickets, classifications, evidence, decisions.
//!
//! Field names here are the interchange contract. Anything that crosses a
//! process boundary serializes from these structs, so renames are breaking.

use crate::error::TriageError;
use serde::{Deserialize, Serialize};

/// Ticket priority as reported by the ticket system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// An incoming support ticket. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub tenant_id: String,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
}

impl Ticket {
    /// Fail-fast validation: a ticket with no tenant cannot be scoped, and a
    /// ticket with no text at all cannot be triaged.
    pub fn validate(&self) -> Result<(), TriageError> {
        if self.tenant_id.trim().is_empty() {
            return Err(TriageError::InvalidTicket(
                "tenant_id must not be empty".to_string(),
            ));
        }
        if self.subject.trim().is_empty() && self.description.trim().is_empty() {
            return Err(TriageError::InvalidTicket(
                "subject and description are both empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Search/classification text: subject and description joined.
    pub fn query_text(&self) -> String {
        format!("{} {}", self.subject, self.description)
    }
}

/// Closed set of ticket intents the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    PasswordReset,
    SystemRestart,
    VpnAccess,
    BackupVerification,
    SoftwareInstallation,
    PrinterIssue,
    EmailIssue,
    NetworkConnectivity,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PasswordReset => "PASSWORD_RESET",
            Self::SystemRestart => "SYSTEM_RESTART",
            Self::VpnAccess => "VPN_ACCESS",
            Self::BackupVerification => "BACKUP_VERIFICATION",
            Self::SoftwareInstallation => "SOFTWARE_INSTALLATION",
            Self::PrinterIssue => "PRINTER_ISSUE",
            Self::EmailIssue => "EMAIL_ISSUE",
            Self::NetworkConnectivity => "NETWORK_CONNECTIVITY",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse from the wire label (for scorer responses and corpus tests).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PASSWORD_RESET" => Some(Self::PasswordReset),
            "SYSTEM_RESTART" => Some(Self::SystemRestart),
            "VPN_ACCESS" => Some(Self::VpnAccess),
            "BACKUP_VERIFICATION" => Some(Self::BackupVerification),
            "SOFTWARE_INSTALLATION" => Some(Self::SoftwareInstallation),
            "PRINTER_ISSUE" => Some(Self::PrinterIssue),
            "EMAIL_ISSUE" => Some(Self::EmailIssue),
            "NETWORK_CONNECTIVITY" => Some(Self::NetworkConnectivity),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// SOP category for category-first retrieval. Intents without a mapped
    /// category fall back to unfiltered semantic search.
    pub fn category(&self) -> Option<&'static str> {
        match self {
            Self::PasswordReset => Some("password_reset"),
            Self::SystemRestart => Some("system_restart"),
            Self::VpnAccess => Some("vpn_access"),
            Self::BackupVerification => Some("backup_verification"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying one ticket. Produced fresh per ticket, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    pub is_automatable: bool,
    pub rationale: String,
}

/// One indexed segment of an SOP document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SopChunk {
    pub sop_id: String,
    pub tenant_id: String,
    pub title: String,
    pub category: String,
    pub chunk_index: usize,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// One retrieved chunk with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub chunk: SopChunk,
    pub similarity: f32,
}

/// Risk level of an action plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step of an action plan. `step_number` is 1-based and dense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub step_number: u32,
    pub description: String,
    pub estimated_time_seconds: u64,
    #[serde(default)]
    pub requires_approval: bool,
}

/// The final triage output for one ticket: intent, plan, risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub ticket_id: String,
    pub intent: Intent,
    pub steps: Vec<ActionStep>,
    pub total_estimated_time_seconds: u64,
    pub requires_human_approval: bool,
    pub risk_level: RiskLevel,
}

/// Ingestion-boundary input: one raw SOP document before chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SopDocument {
    pub tenant_id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(tenant: &str, subject: &str, description: &str) -> Ticket {
        Ticket {
            id: "T-1".to_string(),
            tenant_id: tenant.to_string(),
            subject: subject.to_string(),
            description: description.to_string(),
            priority: Priority::default(),
            requester_email: None,
        }
    }

    #[test]
    fn validate_rejects_missing_tenant() {
        let t = ticket("", "printer broken", "paper jam");
        assert!(matches!(t.validate(), Err(TriageError::InvalidTicket(_))));
    }

    #[test]
    fn validate_rejects_empty_text() {
        let t = ticket("acme", "   ", "");
        assert!(matches!(t.validate(), Err(TriageError::InvalidTicket(_))));
    }

    #[test]
    fn validate_accepts_subject_only() {
        let t = ticket("acme", "vpn down", "");
        assert!(t.validate().is_ok());
    }

    #[test]
    fn intent_labels_round_trip() {
        for intent in [
            Intent::PasswordReset,
            Intent::SystemRestart,
            Intent::VpnAccess,
            Intent::BackupVerification,
            Intent::SoftwareInstallation,
            Intent::PrinterIssue,
            Intent::EmailIssue,
            Intent::NetworkConnectivity,
            Intent::Unknown,
        ] {
            assert_eq!(Intent::from_label(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::from_label("not-a-thing"), None);
    }

    #[test]
    fn classification_wire_shape_is_stable() {
        let c = Classification {
            intent: Intent::PasswordReset,
            confidence: 0.95,
            sub_category: None,
            is_automatable: true,
            rationale: "matched keywords".to_string(),
        };
        let wire = serde_json::to_value(&c).unwrap();
        assert_eq!(wire["intent"], "PASSWORD_RESET");
        assert_eq!(wire["confidence"], 0.95);
        assert_eq!(wire["is_automatable"], true);
        assert_eq!(wire["rationale"], "matched keywords");
        // absent sub_category stays off the wire
        assert!(wire.get("sub_category").is_none());
    }

    #[test]
    fn only_four_intents_map_to_categories() {
        let mapped: Vec<_> = [
            Intent::PasswordReset,
            Intent::SystemRestart,
            Intent::VpnAccess,
            Intent::BackupVerification,
        ]
        .iter()
        .filter_map(|i| i.category())
        .collect();
        assert_eq!(
            mapped,
            vec![
                "password_reset",
                "system_restart",
                "vpn_access",
                "backup_verification"
            ]
        );
        assert_eq!(Intent::PrinterIssue.category(), None);
        assert_eq!(Intent::Unknown.category(), None);
    }
}

//! Deterministic keyword classifier.
//!
//! Pure and idempotent: the same text always yields the same result, which
//! makes this the reliable floor under the external scorer.

use super::ScoredIntent;
use opsdesk_common::Intent;

/// One intent rule: keyword set plus base confidence.
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
    pub base_confidence: f64,
}

/// Declaration order is the tie-break: when two intents reach equal
/// confidence, the first-declared rule wins.
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::PasswordReset,
        keywords: &[
            "password",
            "reset",
            "forgot",
            "login",
            "cannot log in",
            "locked out",
            "credentials",
        ],
        base_confidence: 0.9,
    },
    IntentRule {
        intent: Intent::SystemRestart,
        keywords: &[
            "restart",
            "reboot",
            "slow",
            "frozen",
            "hung",
            "not responding",
            "performance",
        ],
        base_confidence: 0.85,
    },
    IntentRule {
        intent: Intent::VpnAccess,
        keywords: &[
            "vpn",
            "remote access",
            "work from home",
            "connect remotely",
            "access network",
        ],
        base_confidence: 0.9,
    },
    IntentRule {
        intent: Intent::BackupVerification,
        keywords: &["backup", "restore", "data recovery", "backup failed"],
        base_confidence: 0.85,
    },
    IntentRule {
        intent: Intent::SoftwareInstallation,
        keywords: &["install", "software", "application", "program", "need access to"],
        base_confidence: 0.8,
    },
    IntentRule {
        intent: Intent::PrinterIssue,
        keywords: &["printer", "print", "printing", "cant print", "print job"],
        base_confidence: 0.85,
    },
    IntentRule {
        intent: Intent::EmailIssue,
        keywords: &["email", "outlook", "cannot send", "cannot receive", "mailbox"],
        base_confidence: 0.85,
    },
    IntentRule {
        intent: Intent::NetworkConnectivity,
        keywords: &["network", "internet", "wifi", "connection", "cannot connect", "offline"],
        base_confidence: 0.8,
    },
];

/// Confidence never reaches 1.0 from keywords alone.
const CONFIDENCE_CAP: f64 = 0.98;

/// Bonus per distinct keyword hit beyond the first.
const MATCH_BONUS: f64 = 0.05;

pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Classify lowercased text against the rule table. No rule matching is
    /// a valid outcome (UNKNOWN at 0.0), never an error.
    pub fn classify(&self, text: &str) -> ScoredIntent {
        let text = text.to_lowercase();

        let mut best: Option<(&IntentRule, usize, f64)> = None;
        for rule in INTENT_RULES {
            let matches = rule.keywords.iter().filter(|kw| text.contains(**kw)).count();
            if matches == 0 {
                continue;
            }
            let confidence =
                (rule.base_confidence + (matches as f64 - 1.0) * MATCH_BONUS).min(CONFIDENCE_CAP);
            // strict greater keeps the first-declared rule on ties
            if best.map_or(true, |(_, _, c)| confidence > c) {
                best = Some((rule, matches, confidence));
            }
        }

        match best {
            Some((rule, matches, confidence)) => ScoredIntent {
                intent: rule.intent,
                confidence,
                rationale: format!(
                    "Matched {} keyword(s) for {} ({:.0}% confidence)",
                    matches,
                    rule.intent,
                    confidence * 100.0
                ),
            },
            None => ScoredIntent {
                intent: Intent::Unknown,
                confidence: 0.0,
                rationale:
                    "Could not classify ticket based on available keywords. Human review required."
                        .to_string(),
            },
        }
    }
}

//! Opsdesk engine configuration.
//!
//! Loaded once at process start from a TOML file; every field has a default
//! so a missing or partial file still yields a working engine.

use crate::error::TriageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Chunking settings for SOP ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingSettings {
    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters of overlap carried from the tail of the previous chunk
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    50
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

/// Retrieval settings. The category-first path trusts weaker semantic
/// matches because the category already narrowed relevance; the general
/// path needs stronger confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Max results when filtering by a known category
    #[serde(default = "default_category_top_k")]
    pub category_top_k: usize,

    /// Similarity floor (inclusive) when filtering by category
    #[serde(default = "default_category_floor")]
    pub category_floor: f32,

    /// Max results for unfiltered semantic search
    #[serde(default = "default_general_top_k")]
    pub general_top_k: usize,

    /// Similarity floor (inclusive) for unfiltered search
    #[serde(default = "default_general_floor")]
    pub general_floor: f32,
}

fn default_category_top_k() -> usize {
    3
}

fn default_category_floor() -> f32 {
    0.3
}

fn default_general_top_k() -> usize {
    5
}

fn default_general_floor() -> f32 {
    0.5
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            category_top_k: default_category_top_k(),
            category_floor: default_category_floor(),
            general_top_k: default_general_top_k(),
            general_floor: default_general_floor(),
        }
    }
}

/// Classifier thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// External scorer results below this confidence fall back to the
    /// deterministic classifier
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,

    /// Minimum confidence for an automatable intent to be marked automatable
    #[serde(default = "default_automatable_min_confidence")]
    pub automatable_min_confidence: f64,
}

fn default_low_confidence_threshold() -> f64 {
    0.55
}

fn default_automatable_min_confidence() -> f64 {
    0.75
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            low_confidence_threshold: default_low_confidence_threshold(),
            automatable_min_confidence: default_automatable_min_confidence(),
        }
    }
}

/// External scorer (LLM) endpoint settings. Disabled by default; the engine
/// is fully functional on the deterministic classifier alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_scorer_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_scorer_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Hard bound on one scorer call; timeouts are treated as no signal
    #[serde(default = "default_scorer_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_scorer_endpoint() -> String {
    "http://localhost:11434/v1/chat/completions".to_string()
}

fn default_scorer_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_scorer_timeout_secs() -> u64 {
    10
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_scorer_endpoint(),
            model: default_scorer_model(),
            api_key: None,
            timeout_secs: default_scorer_timeout_secs(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub chunking: ChunkingSettings,

    #[serde(default)]
    pub retrieval: RetrievalSettings,

    #[serde(default)]
    pub classifier: ClassifierSettings,

    #[serde(default)]
    pub scorer: ScorerSettings,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, TriageError> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| TriageError::Config(e.to_string()))
    }

    /// Load from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_default()
        } else {
            Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_engine_contract() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.chunking.chunk_size, 500);
        assert_eq!(cfg.chunking.overlap, 50);
        assert_eq!(cfg.retrieval.category_top_k, 3);
        assert!((cfg.retrieval.category_floor - 0.3).abs() < f32::EPSILON);
        assert_eq!(cfg.retrieval.general_top_k, 5);
        assert!((cfg.retrieval.general_floor - 0.5).abs() < f32::EPSILON);
        assert!((cfg.classifier.low_confidence_threshold - 0.55).abs() < f64::EPSILON);
        assert!(!cfg.scorer.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[chunking]\nchunk_size = 200").unwrap();
        let cfg = EngineConfig::load(f.path()).unwrap();
        assert_eq!(cfg.chunking.chunk_size, 200);
        assert_eq!(cfg.chunking.overlap, 50);
        assert_eq!(cfg.retrieval.general_top_k, 5);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = EngineConfig::load_or_default(Path::new("/nonexistent/opsdesk.toml"));
        assert_eq!(cfg.chunking.chunk_size, 500);
    }
}

//! SOP document chunker.
//!
//! Splits raw SOP text into overlapping segments for indexing. Paragraph
//! boundaries are preferred; a paragraph that alone exceeds the budget is
//! split on sentence boundaries instead. A single sentence over budget
//! becomes its own oversized chunk rather than being truncated.

use opsdesk_common::ChunkingSettings;
use regex::Regex;

pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
    paragraph_re: Regex,
    sentence_re: Regex,
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            paragraph_re: Regex::new(r"\n\s*\n").expect("static paragraph regex"),
            sentence_re: Regex::new(r"[.!?]+\s+").expect("static sentence regex"),
        }
    }

    pub fn from_settings(settings: &ChunkingSettings) -> Self {
        Self::new(settings.chunk_size, settings.overlap)
    }

    /// Split `text` into ordered, non-empty chunks. Consecutive chunks share
    /// an overlap taken from the tail of the previous chunk. Empty or
    /// whitespace-only input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let units = self.split_units(text);

        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();

        for unit in units {
            if current.is_empty() {
                current = unit;
            } else if current.len() + unit.len() > self.chunk_size {
                let tail = tail_chars(&current, self.overlap);
                chunks.push(std::mem::take(&mut current));
                current = if tail.is_empty() {
                    unit
                } else {
                    format!("{} {}", tail, unit)
                };
            } else {
                current.push_str("\n\n");
                current.push_str(&unit);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Paragraphs first; paragraphs over budget degrade to sentences.
    fn split_units(&self, text: &str) -> Vec<String> {
        let mut units = Vec::new();
        for para in self.paragraph_re.split(text) {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }
            if para.len() > self.chunk_size {
                for sentence in self.sentence_re.split(para) {
                    let sentence = sentence.trim();
                    if !sentence.is_empty() {
                        units.push(sentence.to_string());
                    }
                }
            } else {
                units.push(para.to_string());
            }
        }
        units
    }
}

/// Last `n` characters of `s`, respecting UTF-8 boundaries.
fn tail_chars(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let len = s.chars().count();
    if len <= n {
        return s.to_string();
    }
    s.chars().skip(len - n).collect()
}

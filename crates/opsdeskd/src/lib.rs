//! Opsdesk Daemon - Ticket triage decision engine.
//!
//! Classifies ticket intent, retrieves tenant-scoped SOP evidence, and
//! synthesizes a risk-annotated action plan. Plans are proposals; execution
//! is the caller's explicit act, gated by human approval.

pub mod chunker;
pub mod classifier;
pub mod demo;
pub mod embedding;
pub mod engine;
pub mod index;
pub mod ingest;
pub mod planner;
pub mod retriever;
pub mod tools;

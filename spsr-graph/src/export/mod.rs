//! Artifact writers: corpus JSONL, graph JSONL/GraphML and the run summary.

pub mod graphml;
pub mod jsonl;
pub mod save_all;

pub use save_all::{PersistFiles, PersistSummary, persist_all};

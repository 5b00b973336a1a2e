//! SPSR-Graph: repository-level code graph construction and training-chain sampling.
//!
//! Source files are parsed into syntax trees, split into structural units,
//! linked through calls, type usages, nesting and source order into one
//! repository-wide graph, and sampled into bounded chains that are linearized
//! as completion training records.
//!
//! The main entry point is [`run::build_corpus`].

pub mod assemble;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod graph;
pub mod languages;
pub mod metrics;
pub mod model;
pub mod resolve;
pub mod run;
pub mod segment;
pub mod traverse;

pub use error::{CorpusError, Result};

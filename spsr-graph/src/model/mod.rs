pub mod chain;
pub mod graph;
pub mod language;
pub mod sample;
pub mod span;
pub mod unit;

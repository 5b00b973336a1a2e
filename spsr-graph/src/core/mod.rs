//! Pipeline plumbing shared by every stage: scanning, parsing, ids, paths
//! and the run report.

pub mod fs_scan;
pub mod ids;
pub mod normalize;
pub mod parse;
pub mod summary;
pub mod traits;

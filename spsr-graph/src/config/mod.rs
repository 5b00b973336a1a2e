//! Configuration loader and validator.
//!
//! Resolution order:
//! 1. defaults ([`CorpusConfig::default`]);
//! 2. YAML file: explicit path, else `$SPSR_CONFIG`, else `<root>/spsr.yml` when present;
//! 3. environment overrides (`SPSR_MAX_DEPTH`, `SPSR_MAX_CHILDREN`,
//!    `SPSR_INCLUDE_STRUCTS`, `SPSR_LENGTH_BUDGET`, `SPSR_THREADS`, `SPSR_OUT_DIR`);
//! 4. validation.

pub mod model;

use crate::config::model::CorpusConfig;
use crate::error::{CorpusError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default config file name looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = "spsr.yml";

/// Load [`CorpusConfig`] for the repository at `root`.
///
/// # Arguments
/// * `root` - canonical path to the repository root.
/// * `explicit` - config file passed by the caller; takes precedence over lookup.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<CorpusConfig> {
    let file = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("SPSR_CONFIG").ok().map(PathBuf::from))
        .or_else(|| {
            let candidate = root.join(CONFIG_FILE_NAME);
            candidate.is_file().then_some(candidate)
        });

    let mut cfg = match file {
        Some(path) => {
            let cfg = from_yaml_file(&path)?;
            info!(path = %path.display(), "config: loaded file");
            cfg
        }
        None => {
            debug!("config: no file, using defaults");
            CorpusConfig::default()
        }
    };

    apply_env_overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

/// Parse a YAML config file. Missing fields take their defaults.
pub fn from_yaml_file(path: &Path) -> Result<CorpusConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    from_yaml_str(&text)
}

pub fn from_yaml_str(text: &str) -> Result<CorpusConfig> {
    if text.trim().is_empty() {
        return Ok(CorpusConfig::default());
    }
    Ok(serde_yml::from_str(text)?)
}

/// Apply `SPSR_*` environment overrides in place.
///
/// Unparsable values are ignored and the current value is kept.
pub fn apply_env_overrides(cfg: &mut CorpusConfig) {
    let s = &mut cfg.sampling;
    s.max_depth = parse("SPSR_MAX_DEPTH", s.max_depth);
    s.max_children = parse("SPSR_MAX_CHILDREN", s.max_children);
    s.include_structs = parse("SPSR_INCLUDE_STRUCTS", s.include_structs);
    s.length_budget = parse("SPSR_LENGTH_BUDGET", s.length_budget);
    cfg.threads = parse("SPSR_THREADS", cfg.threads);
    if let Ok(dir) = std::env::var("SPSR_OUT_DIR") {
        if !dir.trim().is_empty() {
            cfg.output.out_dir = Some(PathBuf::from(dir));
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

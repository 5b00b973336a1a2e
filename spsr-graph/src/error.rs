use crate::core::parse::ParseFailure;
use crate::model::unit::UnitId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("repository not found: {0}")]
    RepositoryNotFound(PathBuf),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse failure: {0}")]
    Parse(#[from] ParseFailure),

    #[error("context of unit {unit_id} needs {length} chars with its file header, budget is {budget}")]
    BudgetExceeded {
        unit_id: UnitId,
        length: usize,
        budget: usize,
    },

    #[error("unknown unit: {0}")]
    UnknownUnit(UnitId),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("serde json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serde yaml error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

impl CorpusError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CorpusError>;

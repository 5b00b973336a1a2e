//! Traversal output: an ordered, cycle-free sequence of units.

use crate::model::{graph::EdgeKind, unit::UnitId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    pub unit_id: UnitId,
    /// Unit this link was discovered from; `None` for the start unit.
    pub via: Option<UnitId>,
    /// Edge kind followed from `via`; `None` for the start unit.
    pub relation: Option<EdgeKind>,
    /// Expansion steps from the start unit.
    pub depth: usize,
    pub confidence: f32,
}

/// Links in breadth-first discovery order. The first link is the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub links: Vec<ChainLink>,
}

impl Chain {
    pub(crate) fn start(unit_id: UnitId) -> Self {
        Self {
            links: vec![ChainLink {
                unit_id,
                via: None,
                relation: None,
                depth: 0,
                confidence: 1.0,
            }],
        }
    }

    pub fn target(&self) -> Option<&UnitId> {
        self.links.first().map(|l| &l.unit_id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.links.iter().map(|l| l.depth).max().unwrap_or(0)
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = &UnitId> {
        self.links.iter().map(|l| &l.unit_id)
    }
}

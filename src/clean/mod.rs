//! Cleaner stage: in-place cleaning operations on a session table

mod dedup;
mod impute;

use serde::Serialize;

pub use dedup::deduplicate;
pub use impute::{impute, ImputeReport};

use crate::model::Table;

/// A user-triggered cleaning operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanOp {
    /// Drop rows that repeat an earlier row
    Dedup,
    /// Fill missing cells with the column mean or mode
    Impute,
}

impl std::fmt::Display for CleanOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanOp::Dedup => write!(f, "dedup"),
            CleanOp::Impute => write!(f, "impute"),
        }
    }
}

/// What a cleaning operation did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum CleanOutcome {
    Dedup { removed: usize },
    Impute(ImputeReport),
}

impl CleanOp {
    /// Apply this operation to `table` in place
    pub fn apply(self, table: &mut Table) -> CleanOutcome {
        match self {
            CleanOp::Dedup => CleanOutcome::Dedup {
                removed: deduplicate(table),
            },
            CleanOp::Impute => CleanOutcome::Impute(impute(table)),
        }
    }
}

impl std::fmt::Display for CleanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanOutcome::Dedup { removed } => write!(f, "Duplicates removed: {}", removed),
            CleanOutcome::Impute(report) => write!(
                f,
                "Missing values have been filled: {} (remaining missing values: {})",
                report.filled, report.remaining
            ),
        }
    }
}

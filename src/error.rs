//! Error types for FRSP Insight

use thiserror::Error;

/// Errors raised at the dataset load and report encode boundaries.
///
/// The aggregators themselves are total over their inputs and never fail;
/// data-quality states (unresolvable rolls, empty sets) surface as ordinary
/// output values instead.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown attendance batch label: {0}")]
    UnknownBatch(String),

    #[error("No roll number base for section: {0}")]
    MissingRollBase(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),
}

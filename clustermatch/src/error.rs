use thiserror::Error;

/// Errors returned by cluster matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// A claims or rejections entry names a group missing from the old partition.
    #[error("clustermatch: {relation} reference unknown old group {key}")]
    UnknownOldGroup { relation: &'static str, key: String },

    /// A cost function returned NaN or an infinity.
    #[error("clustermatch: cost at row {row}, column {column} is not finite ({value})")]
    NonFiniteCost { row: usize, column: usize, value: f64 },

    /// The assignment solver gave up on a cost matrix.
    #[error("clustermatch: assignment failed: {reason}")]
    Unsolvable { reason: String },
}

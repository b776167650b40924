use thiserror::Error;

/// Errors raised while planning or applying transforms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An argument was outside its valid domain.
    #[error("invalid argument `{arg}`: {reason}")]
    InvalidArgument { arg: &'static str, reason: String },
    /// Only one-dimensional transforms are planned.
    #[error("only one-dimensional transforms are supported, got rank {rank}")]
    UnsupportedRank { rank: usize },
    /// A frequency was not finite or not in `[-pi, pi)`.
    #[error("frequency {value} at index {index} is outside [-pi, pi)")]
    FrequencyOutOfRange { index: usize, value: f64 },
    /// An input did not have the planned length.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

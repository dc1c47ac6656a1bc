use thiserror::Error;

use crate::dtype::DType;

/// Failure taxonomy of the engine. Every public operation validates its
/// preconditions before allocating output, so an error never leaves a
/// partially written handle behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("shape mismatch in `{operation}`: {left:?} vs {right:?}")]
    ShapeMismatch {
        operation: &'static str,
        left: Vec<usize>,
        right: Vec<usize>,
    },

    #[error("`{operation}` does not apply to element type `{}`", dtype.label())]
    UnsupportedType {
        operation: &'static str,
        dtype: DType,
    },

    #[error("`{operation}` requires {expected}, got {got}")]
    InvalidOperatorArity {
        operation: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("invalid configuration for `{operation}`: {reason}")]
    InvalidConfiguration {
        operation: &'static str,
        reason: String,
    },

    #[error("cannot convert between `{}` and `{}`", from.label(), to.label())]
    ConversionFailure { from: DType, to: DType },
}

pub type Result<T> = std::result::Result<T, GridError>;

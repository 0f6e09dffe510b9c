//! Duplication failures.

use std::fmt;

use mimic_types::{Idx, TypeError};

/// Why a type shape cannot be duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// Arrays with two or more dimensions.
    MultiDimensionalArray { rank: u8 },
    /// A class that was declared but never completed.
    IncompleteClass,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::MultiDimensionalArray { rank } => {
                write!(f, "arrays of rank {rank} are not supported")
            }
            UnsupportedReason::IncompleteClass => write!(f, "the class is only forward-declared"),
        }
    }
}

/// Failure to duplicate a value.
///
/// No partial result is produced when any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloneError {
    /// The type shape has no duplication routine.
    ///
    /// Raised the first time the shape is encountered, whatever the data.
    #[error("cannot duplicate `{type_name}`: {reason}")]
    UnsupportedShape {
        ty: Idx,
        type_name: String,
        reason: UnsupportedReason,
    },

    /// A routine or entry point received a value it was not built for.
    #[error("duplication contract violated: expected {expected}, found {found}")]
    ContractViolation { expected: String, found: String },

    /// A value refers to a type the engine's pool does not know.
    #[error("{0} is not registered in the type pool")]
    UnknownType(Idx),

    /// The value nests deeper than the configured limit.
    #[error("value nesting exceeds the depth limit of {limit}")]
    DepthExceeded { limit: usize },
}

impl From<TypeError> for CloneError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnknownType(idx) => CloneError::UnknownType(idx),
            other => CloneError::ContractViolation {
                expected: "a well-formed type".to_owned(),
                found: other.to_string(),
            },
        }
    }
}

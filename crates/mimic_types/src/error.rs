//! Errors raised while defining shapes or building values.

use crate::Idx;

/// Failure to define a type shape or to build a value of one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// An index does not name a type in the pool.
    #[error("{0} is not registered in the type pool")]
    UnknownType(Idx),

    /// A class tried to derive from something that is not a class.
    #[error("`{name}` cannot derive from `{base}`: base is not a class")]
    InvalidBase { name: String, base: String },

    /// A class tried to derive from a class that is only forward-declared.
    #[error("`{name}` cannot derive from `{base}`: base is only forward-declared")]
    IncompleteBase { name: String, base: String },

    /// `complete_class` was called on something other than a forward declaration.
    #[error("`{0}` is not a forward-declared class")]
    NotForward(String),

    /// Arrays must have at least one dimension.
    #[error("array rank must be at least 1")]
    ZeroRank,

    /// A type was used where a different kind of shape is required.
    #[error("`{name}` is not a {expected}")]
    KindMismatch { name: String, expected: &'static str },

    /// The number of supplied slots does not match the shape.
    #[error("`{name}` expects {expected} slots, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

//! Declared class properties.
//!
//! `TypeFlags` are fixed when a class is defined and never recomputed.
//! Inheritable flags propagate from a base class to every subclass.

use bitflags::bitflags;

bitflags! {
    /// Properties declared on a class shape.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u32 {
        /// Instances are immutable by contract and may be shared freely.
        ///
        /// Duplication returns the same reference for such instances.
        const IMMUTABLE = 1 << 0;
    }
}

impl TypeFlags {
    /// Flags a subclass receives from its base.
    pub const INHERITED: Self = Self::IMMUTABLE;

    /// Merge the inheritable part of `base` into these flags.
    #[inline]
    #[must_use]
    pub fn inherit_from(self, base: Self) -> Self {
        self | (base & Self::INHERITED)
    }

    /// Check if instances are immutable by contract.
    #[inline]
    pub fn is_immutable(self) -> bool {
        self.contains(Self::IMMUTABLE)
    }
}

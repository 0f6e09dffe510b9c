//! Type identity handle.
//!
//! `Idx` is the identity of a type shape. Every shape lives in a [`Pool`]
//! and is referenced by its 32-bit index, so type equality is index equality
//! and an `Idx` is a cheap hash-map key.
//!
//! Built-in shapes occupy fixed indices (0-8) and are registered when the
//! pool is created. User-defined records, classes, and arrays follow.
//!
//! [`Pool`]: crate::Pool

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Built-in Shapes (indices 0-8) ===

    /// 64-bit signed integer.
    pub const INT: Self = Self(0);
    /// 64-bit floating point.
    pub const FLOAT: Self = Self(1);
    /// Boolean.
    pub const BOOL: Self = Self(2);
    /// Unicode scalar value.
    pub const CHAR: Self = Self(3);
    /// 8-bit unsigned integer.
    pub const BYTE: Self = Self(4);
    /// The unit type `()`.
    pub const UNIT: Self = Self(5);
    /// Immutable UTF-8 text.
    pub const STR: Self = Self(6);
    /// Type-descriptor values (a value that names a type).
    pub const TYPE: Self = Self(7);
    /// The universal base class. Every class derives from it; it has no slots.
    pub const OBJECT: Self = Self(8);

    /// Number of built-in shapes.
    pub const BUILTIN_COUNT: u32 = 9;

    /// Sentinel value indicating no type.
    pub const NONE: Self = Self(u32::MAX);

    /// Create an index from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position of this type in pool storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the built-in shapes.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Human-readable name for built-in shapes.
    ///
    /// Returns `None` for user-defined shapes, whose names live in the pool.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("int"),
            1 => Some("float"),
            2 => Some("bool"),
            3 => Some("char"),
            4 => Some("byte"),
            5 => Some("()"),
            6 => Some("str"),
            7 => Some("type"),
            8 => Some("object"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None if self.is_none() => write!(f, "Idx::NONE"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None if self.is_none() => f.write_str("<none>"),
            None => write!(f, "type#{}", self.0),
        }
    }
}

// Idx must stay exactly 4 bytes
const _: () = assert!(std::mem::size_of::<Idx>() == 4);

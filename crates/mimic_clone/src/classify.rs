//! Duplication shape classifier.
//!
//! Maps every type in the pool to one of five [`Shape`]s that decide how a
//! value of that type is duplicated. Classification depends only on the type,
//! never on data, so an unsupported shape fails the first time it is seen.
//!
//! Results are memoized in a concurrent map shared by every thread using the
//! engine. Failures are not memoized; they are recomputed (identically) on
//! the next request.

use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use mimic_types::{Idx, Pool, TypeData};

use crate::{CloneError, UnsupportedReason};

/// How values of a type are duplicated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Fixed-layout scalars, and records made only of atomic fields.
    /// Duplicated by raw value copy.
    Atomic,
    /// Immutable by contract (strings, type descriptors, immutable classes).
    /// Duplication returns the same reference.
    OpaqueLeaf,
    /// Rank-1 arrays.
    Array,
    /// Records with at least one non-atomic field.
    ValueAggregate,
    /// Mutable classes, including the universal base.
    ReferenceAggregate,
}

impl Shape {
    /// Check if a well-typed value of this shape is copied without walking slots.
    #[inline]
    pub fn is_leaf(self) -> bool {
        matches!(self, Shape::Atomic | Shape::OpaqueLeaf)
    }
}

/// Memoizing classifier over a [`Pool`].
pub struct Classifier<'pool> {
    pool: &'pool Pool,
    memo: DashMap<Idx, Shape, FxBuildHasher>,
}

impl<'pool> Classifier<'pool> {
    pub fn new(pool: &'pool Pool) -> Self {
        Classifier {
            pool,
            memo: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &'pool Pool {
        self.pool
    }

    /// Classify `idx`.
    pub fn classify(&self, idx: Idx) -> Result<Shape, CloneError> {
        if let Some(shape) = Self::classify_builtin(idx) {
            return Ok(shape);
        }
        let mut in_progress = FxHashSet::default();
        self.classify_in(idx, &mut in_progress)
    }

    /// Number of memoized user-defined shapes.
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    fn classify_in(&self, idx: Idx, in_progress: &mut FxHashSet<Idx>) -> Result<Shape, CloneError> {
        if let Some(shape) = Self::classify_builtin(idx) {
            return Ok(shape);
        }
        if let Some(shape) = self.memo.get(&idx).map(|entry| *entry) {
            return Ok(shape);
        }

        // A record reached again while its own fields are being classified
        // cannot be atomic.
        if !in_progress.insert(idx) {
            return Ok(Shape::ValueAggregate);
        }
        let result = self.classify_data(idx, in_progress);
        in_progress.remove(&idx);

        if let Ok(shape) = result {
            self.memo.insert(idx, shape);
        }
        result
    }

    /// Fast path for built-in shapes, without touching the pool or memo.
    #[inline]
    fn classify_builtin(idx: Idx) -> Option<Shape> {
        match idx {
            Idx::INT | Idx::FLOAT | Idx::BOOL | Idx::CHAR | Idx::BYTE | Idx::UNIT => {
                Some(Shape::Atomic)
            }
            Idx::STR | Idx::TYPE => Some(Shape::OpaqueLeaf),
            Idx::OBJECT => Some(Shape::ReferenceAggregate),
            _ => None,
        }
    }

    fn classify_data(
        &self,
        idx: Idx,
        in_progress: &mut FxHashSet<Idx>,
    ) -> Result<Shape, CloneError> {
        let data = self.pool.get(idx).ok_or(CloneError::UnknownType(idx))?;
        match data {
            TypeData::Int
            | TypeData::Float
            | TypeData::Bool
            | TypeData::Char
            | TypeData::Byte
            | TypeData::Unit => Ok(Shape::Atomic),
            TypeData::Str | TypeData::Type => Ok(Shape::OpaqueLeaf),
            TypeData::Object => Ok(Shape::ReferenceAggregate),

            TypeData::Class(def) => Ok(if def.flags.is_immutable() {
                Shape::OpaqueLeaf
            } else {
                Shape::ReferenceAggregate
            }),

            TypeData::Record(def) => {
                let mut atomic = true;
                for field in &def.fields {
                    if self.classify_in(field.ty, in_progress)? != Shape::Atomic {
                        atomic = false;
                    }
                }
                Ok(if atomic {
                    Shape::Atomic
                } else {
                    Shape::ValueAggregate
                })
            }

            TypeData::Array { rank: 1, .. } => Ok(Shape::Array),
            TypeData::Array { rank, .. } => Err(self.unsupported(
                idx,
                UnsupportedReason::MultiDimensionalArray { rank },
            )),

            TypeData::Forward { .. } => {
                Err(self.unsupported(idx, UnsupportedReason::IncompleteClass))
            }
        }
    }

    fn unsupported(&self, ty: Idx, reason: UnsupportedReason) -> CloneError {
        CloneError::UnsupportedShape {
            ty,
            type_name: self.pool.name(ty),
            reason,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;

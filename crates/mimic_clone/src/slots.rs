//! Slot enumeration.
//!
//! Lists every storage slot a duplication routine must visit. For classes this
//! is the whole declaration chain, base-most class first, so inherited
//! private state is never skipped.

use std::sync::Arc;

use mimic_types::{Idx, Pool, Slots, TypeData, Value};

use crate::{CloneError, UnsupportedReason};

/// Name of the synthetic slot describing an array's elements.
pub const ELEMENT_SLOT: &str = "[]";

/// One storage slot of a record, class, or array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotDesc {
    /// The type that declares the slot (a base class for inherited slots).
    pub declaring: Idx,
    pub name: Arc<str>,
    /// Declared type of the slot; the stored value may be a subclass.
    pub ty: Idx,
    /// Position in the instance's storage.
    pub index: usize,
}

impl SlotDesc {
    /// Read this slot from `src`.
    #[inline]
    pub fn read<S: Slots + ?Sized>(&self, src: &S) -> Option<Value> {
        src.read_slot(self.index)
    }

    /// Write `value` into this slot of `dst`.
    #[inline]
    pub fn write<S: Slots + ?Sized>(&self, dst: &mut S, value: Value) -> bool {
        dst.write_slot(self.index, value)
    }

    /// Check if this is the synthetic element slot of an array.
    pub fn is_element(&self) -> bool {
        &*self.name == ELEMENT_SLOT
    }
}

/// Every slot of `ty`, in storage order.
///
/// Scalars, strings and type descriptors have no slots. Arrays have a single
/// synthetic element slot carrying the element type.
pub fn enumerate(pool: &Pool, ty: Idx) -> Result<Vec<SlotDesc>, CloneError> {
    let data = pool.get(ty).ok_or(CloneError::UnknownType(ty))?;
    match data {
        TypeData::Record(def) => Ok(def
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| SlotDesc {
                declaring: ty,
                name: Arc::clone(&field.name),
                ty: field.ty,
                index,
            })
            .collect()),

        TypeData::Object | TypeData::Class(_) => {
            let chain = pool.class_chain(ty)?;
            let slots = chain
                .iter()
                .flat_map(|(declaring, def)| def.fields.iter().map(move |field| (*declaring, field)))
                .enumerate()
                .map(|(index, (declaring, field))| SlotDesc {
                    declaring,
                    name: Arc::clone(&field.name),
                    ty: field.ty,
                    index,
                })
                .collect();
            Ok(slots)
        }

        TypeData::Array { elem, .. } => Ok(vec![SlotDesc {
            declaring: ty,
            name: Arc::from(ELEMENT_SLOT),
            ty: elem,
            index: 0,
        }]),

        TypeData::Forward { .. } => Err(CloneError::UnsupportedShape {
            ty,
            type_name: pool.name(ty),
            reason: UnsupportedReason::IncompleteClass,
        }),

        TypeData::Int
        | TypeData::Float
        | TypeData::Bool
        | TypeData::Char
        | TypeData::Byte
        | TypeData::Unit
        | TypeData::Str
        | TypeData::Type => Ok(Vec::new()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;

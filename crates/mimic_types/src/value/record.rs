//! Inline value aggregates.

use crate::{Idx, Pool, TypeData, TypeError};

use super::{Slots, Value};

/// An instance of a record shape.
///
/// Fields are owned inline, so cloning a record copies every slot. Slots
/// that hold objects or arrays still copy only the reference.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
    ty: Idx,
    fields: Box<[Value]>,
}

impl RecordValue {
    /// Build a record from field values in declaration order.
    pub fn new(pool: &Pool, ty: Idx, fields: Vec<Value>) -> Result<Self, TypeError> {
        let def = match pool.try_get(ty)? {
            TypeData::Record(def) => def,
            _ => {
                return Err(TypeError::KindMismatch {
                    name: pool.name(ty),
                    expected: "record",
                })
            }
        };
        if def.fields.len() != fields.len() {
            return Err(TypeError::ArityMismatch {
                name: def.name.clone(),
                expected: def.fields.len(),
                found: fields.len(),
            });
        }
        Ok(RecordValue {
            ty,
            fields: fields.into_boxed_slice(),
        })
    }

    /// A record of `ty` with every field zeroed.
    pub fn zeroed(pool: &Pool, ty: Idx) -> Result<Self, TypeError> {
        let fields = match pool.try_get(ty)? {
            TypeData::Record(def) => def
                .fields
                .iter()
                .map(|field| Value::zeroed(pool, field.ty))
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(TypeError::KindMismatch {
                    name: pool.name(ty),
                    expected: "record",
                })
            }
        };
        Ok(RecordValue {
            ty,
            fields: fields.into_boxed_slice(),
        })
    }

    pub fn ty(&self) -> Idx {
        self.ty
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Replace one field. Returns `false` if `index` is out of range.
    pub fn set_field(&mut self, index: usize, value: Value) -> bool {
        match self.fields.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Look up a field by name.
    pub fn get(&self, pool: &Pool, name: &str) -> Option<&Value> {
        self.field(pool.field_index(self.ty, name)?)
    }

    /// Replace a field by name. Returns `false` if there is no such field.
    pub fn set(&mut self, pool: &Pool, name: &str, value: Value) -> bool {
        match pool.field_index(self.ty, name) {
            Some(index) => self.set_field(index, value),
            None => false,
        }
    }
}

impl Slots for RecordValue {
    fn slot_count(&self) -> usize {
        self.fields.len()
    }

    fn read_slot(&self, index: usize) -> Option<Value> {
        self.fields.get(index).cloned()
    }

    fn write_slot(&mut self, index: usize, value: Value) -> bool {
        self.set_field(index, value)
    }
}

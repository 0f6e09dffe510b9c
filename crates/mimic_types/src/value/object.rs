//! Heap objects with reference semantics.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Idx, Pool, TypeError};

use super::{Shallow, Slots, Value};

struct ObjectData {
    ty: Idx,
    slots: RwLock<Box<[Value]>>,
}

/// Shared reference to a heap object.
///
/// Cloning an `ObjectRef` aliases the object. Slots are mutable through any
/// alias; each read or write takes the slot lock briefly and never holds it
/// across other work.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectData>);

impl ObjectRef {
    /// Normal construction.
    ///
    /// Allocates `ty` with zeroed slots (inherited ones included), then runs
    /// the constructor of every class in the chain, base-most first.
    pub fn new(pool: &Pool, ty: Idx) -> Result<Self, TypeError> {
        let chain = pool.class_chain(ty)?;
        let slots = chain
            .iter()
            .flat_map(|(_, def)| def.fields.iter())
            .map(|field| Value::zeroed(pool, field.ty))
            .collect::<Result<Vec<_>, _>>()?;

        let object = Self::allocate_raw(ty, slots.into_boxed_slice());
        for (_, def) in &chain {
            if let Some(ctor) = &def.constructor {
                ctor(&object);
            }
        }
        Ok(object)
    }

    /// Constructor-bypassing allocation.
    ///
    /// Creates an instance of `ty` holding exactly `slots`. No user code runs
    /// and the slots are not checked against the class layout; callers are
    /// responsible for supplying one value per slot in storage order.
    pub fn allocate_raw(ty: Idx, slots: Box<[Value]>) -> Self {
        ObjectRef(Arc::new(ObjectData {
            ty,
            slots: RwLock::new(slots),
        }))
    }

    /// Concrete runtime class of this object.
    pub fn ty(&self) -> Idx {
        self.0.ty
    }

    pub fn len(&self) -> usize {
        self.0.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.slots.read().is_empty()
    }

    /// Read one slot.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.slots.read().get(index).cloned()
    }

    /// Write one slot. Returns `false` if `index` is out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.slots.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Read a slot by name.
    pub fn get_field(&self, pool: &Pool, name: &str) -> Option<Value> {
        self.get(pool.field_index(self.ty(), name)?)
    }

    /// Write a slot by name. Returns `false` if there is no such slot.
    pub fn set_field(&self, pool: &Pool, name: &str, value: Value) -> bool {
        match pool.field_index(self.ty(), name) {
            Some(index) => self.set(index, value),
            None => false,
        }
    }

    /// Copy of every slot, taken under a single read lock.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.slots.read().to_vec()
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Slots for ObjectRef {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn read_slot(&self, index: usize) -> Option<Value> {
        self.get(index)
    }

    fn write_slot(&mut self, index: usize, value: Value) -> bool {
        self.set(index, value)
    }
}

/// Structural equality: same class and equal slots.
///
/// Comparison recurses through referenced objects without a depth bound.
/// Two distinct cyclic graphs never finish comparing; a graph compared with
/// itself stops at the identity check.
impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        // Snapshot each side separately so two locks are never held at once.
        self.ty() == other.ty() && self.snapshot() == other.snapshot()
    }
}

/// Slots print one level deep; referenced objects and arrays show only their
/// type, so cyclic graphs format in bounded time.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("ty", &self.ty())
            .field("slots", &Shallow(&self.snapshot()))
            .finish()
    }
}

//! Runtime values of the object model.
//!
//! Scalars and records are stored inline and have value semantics. Objects
//! and arrays live on the heap behind `Arc` and have reference semantics:
//! the derived `Clone` on [`Value`] copies the reference, never the storage.
//! Producing independent storage is the job of the duplication engine.
//!
//! # Construction
//!
//! Objects have two allocation paths:
//!
//! - [`ObjectRef::new`] is normal construction. Slots are zeroed and then the
//!   user constructors of the class chain run, base-most first.
//! - [`ObjectRef::allocate_raw`] allocates an instance from ready-made slots
//!   and runs no user code at all.

mod array;
mod display;
mod object;
mod record;

use std::fmt;
use std::sync::Arc;

pub use array::{ArrayRef, Dims};
pub use display::{ValueDisplay, MAX_DISPLAY_DEPTH};
pub use object::ObjectRef;
pub use record::RecordValue;

use crate::{Idx, Pool, TypeData, TypeError};

/// A dynamically typed runtime value.
#[derive(Clone, Default)]
pub enum Value {
    /// The absent reference.
    #[default]
    Null,
    Unit,
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    Byte(u8),
    /// Immutable text, shared by reference.
    Str(Arc<str>),
    /// A value naming a type.
    Type(Idx),
    /// Inline value aggregate.
    Record(RecordValue),
    /// Reference to a heap object.
    Object(ObjectRef),
    /// Reference to a heap array.
    Array(ArrayRef),
}

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    /// The concrete runtime type of this value, or `None` for `Null`.
    pub fn runtime_type(&self) -> Option<Idx> {
        match self {
            Value::Null => None,
            Value::Unit => Some(Idx::UNIT),
            Value::Int(_) => Some(Idx::INT),
            Value::Float(_) => Some(Idx::FLOAT),
            Value::Bool(_) => Some(Idx::BOOL),
            Value::Char(_) => Some(Idx::CHAR),
            Value::Byte(_) => Some(Idx::BYTE),
            Value::Str(_) => Some(Idx::STR),
            Value::Type(_) => Some(Idx::TYPE),
            Value::Record(record) => Some(record.ty()),
            Value::Object(object) => Some(object.ty()),
            Value::Array(array) => Some(array.ty()),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The default value of `ty`: numeric zero, `Null` for references, and
    /// field-wise zeroed records.
    pub fn zeroed(pool: &Pool, ty: Idx) -> Result<Value, TypeError> {
        Ok(match pool.try_get(ty)? {
            TypeData::Int => Value::Int(0),
            TypeData::Float => Value::Float(0.0),
            TypeData::Bool => Value::Bool(false),
            TypeData::Char => Value::Char('\0'),
            TypeData::Byte => Value::Byte(0),
            TypeData::Unit => Value::Unit,
            TypeData::Record(_) => Value::Record(RecordValue::zeroed(pool, ty)?),
            TypeData::Str
            | TypeData::Type
            | TypeData::Object
            | TypeData::Class(_)
            | TypeData::Array { .. }
            | TypeData::Forward { .. } => Value::Null,
        })
    }

    /// Reference identity.
    ///
    /// True only when both values point at the same heap storage (objects,
    /// arrays, strings). Inline values never share an instance.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Render with type and field names taken from `pool`.
    pub fn display<'a>(&'a self, pool: &'a Pool) -> ValueDisplay<'a> {
        ValueDisplay::new(self, pool)
    }
}

/// Structural equality.
///
/// Objects and arrays compare by type and contents, not identity. Floats
/// compare by bit pattern so that a NaN equals its copy.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Unit => write!(f, "Unit"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Char(c) => write!(f, "Char({c:?})"),
            Value::Byte(b) => write!(f, "Byte({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Type(idx) => write!(f, "Type({idx:?})"),
            Value::Record(record) => fmt::Debug::fmt(record, f),
            Value::Object(object) => fmt::Debug::fmt(object, f),
            Value::Array(array) => fmt::Debug::fmt(array, f),
        }
    }
}

/// Debug view of slot contents that stops at heap references.
pub(crate) struct Shallow<'a>(pub(crate) &'a [Value]);

impl fmt::Debug for Shallow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(ShallowValue))
            .finish()
    }
}

struct ShallowValue<'a>(&'a Value);

impl fmt::Debug for ShallowValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Object(object) => write!(f, "Object({:?})", object.ty()),
            Value::Array(array) => write!(f, "Array({:?}; {})", array.ty(), array.len()),
            Value::Record(record) => f
                .debug_struct("Record")
                .field("ty", &record.ty())
                .field("fields", &Shallow(record.fields()))
                .finish(),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// Slot storage shared by records and objects.
///
/// This is the storage half of a slot accessor: reads return an owned
/// `Value` (references are copied, not their targets) and writes replace a
/// single slot.
pub trait Slots {
    fn slot_count(&self) -> usize;

    fn read_slot(&self, index: usize) -> Option<Value>;

    /// Returns `false` if `index` is out of range.
    fn write_slot(&mut self, index: usize, value: Value) -> bool;
}

/// A detached slot snapshot, as returned by `ObjectRef::snapshot`.
impl Slots for [Value] {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn read_slot(&self, index: usize) -> Option<Value> {
        self.get(index).cloned()
    }

    fn write_slot(&mut self, index: usize, value: Value) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Conversion between host types and [`Value`].
///
/// Gives the typed duplication entry point a static type to return.
/// `Option<T>` maps `None` to `Null`.
pub trait Managed: Sized {
    fn to_value(&self) -> Value;

    /// Returns `None` if `value` is not of this type.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_managed_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Managed for $ty {
                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_managed_scalar! {
    i64 => Int,
    f64 => Float,
    bool => Bool,
    char => Char,
    u8 => Byte,
    Idx => Type,
}

impl Managed for () {
    fn to_value(&self) -> Value {
        Value::Unit
    }

    fn from_value(value: Value) -> Option<Self> {
        matches!(value, Value::Unit).then_some(())
    }
}

impl Managed for Arc<str> {
    fn to_value(&self) -> Value {
        Value::Str(Arc::clone(self))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Managed for RecordValue {
    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl Managed for ObjectRef {
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl Managed for ArrayRef {
    fn to_value(&self) -> Value {
        Value::Array(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl Managed for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl<T: Managed> Managed for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Managed::to_value)
    }

    fn from_value(value: Value) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

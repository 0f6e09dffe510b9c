//! Human-readable rendering of values.

use std::fmt;

use crate::{Idx, Pool};

use super::Value;

/// Aggregates nested deeper than this print as `...`.
pub const MAX_DISPLAY_DEPTH: usize = 32;

/// Renders a [`Value`] using names from a [`Pool`].
///
/// Records and objects print as `Point { x: 3, y: 4 }`, arrays as
/// `[1, 2, 3]`, strings quoted. Cycles are not detected, but nesting is cut
/// off at [`MAX_DISPLAY_DEPTH`].
pub struct ValueDisplay<'a> {
    value: &'a Value,
    pool: &'a Pool,
    depth: usize,
}

impl<'a> ValueDisplay<'a> {
    pub fn new(value: &'a Value, pool: &'a Pool) -> Self {
        ValueDisplay {
            value,
            pool,
            depth: 0,
        }
    }

    fn nested<'b>(&self, value: &'b Value) -> ValueDisplay<'b>
    where
        'a: 'b,
    {
        ValueDisplay {
            value,
            pool: self.pool,
            depth: self.depth + 1,
        }
    }

    fn write_slots(&self, f: &mut fmt::Formatter<'_>, ty: Idx, slots: &[Value]) -> fmt::Result {
        write!(f, "{}", self.pool.name(ty))?;
        let layout = self.pool.slot_layout(ty).unwrap_or_default();
        if slots.is_empty() {
            return Ok(());
        }
        write!(f, " {{ ")?;
        for (i, slot) in slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match layout.get(i) {
                Some(field) => write!(f, "{}: ", field.name)?,
                None => write!(f, "{i}: ")?,
            }
            write!(f, "{}", self.nested(slot))?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.depth > MAX_DISPLAY_DEPTH
            && matches!(self.value, Value::Record(_) | Value::Object(_) | Value::Array(_))
        {
            return write!(f, "...");
        }
        match self.value {
            Value::Null => write!(f, "null"),
            Value::Unit => write!(f, "()"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Byte(b) => write!(f, "{b}b"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Type(idx) => write!(f, "type {}", self.pool.name(*idx)),
            Value::Record(record) => self.write_slots(f, record.ty(), record.fields()),
            Value::Object(object) => self.write_slots(f, object.ty(), &object.snapshot()),
            Value::Array(array) => {
                let elems = array.snapshot();
                write!(f, "[")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.nested(elem))?;
                }
                write!(f, "]")
            }
        }
    }
}

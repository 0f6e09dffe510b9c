//! Duplication routines.
//!
//! A [`Routine`] is generated once per concrete type and interpreted for every
//! value of that type. Generation does all type-level work up front: shape
//! classification of the target and of every slot type, slot enumeration,
//! and the zeroed storage template. Invocation only reads, copies, and
//! writes slots.
//!
//! Routines never run user constructors. Objects are allocated through
//! [`ObjectRef::allocate_raw`] and arrays through [`ArrayRef::from_parts`].

use mimic_types::{ArrayRef, Dims, Idx, ObjectRef, RecordValue, Slots, Value};

use crate::classify::{Classifier, Shape};
use crate::slots::{enumerate, SlotDesc};
use crate::{CloneError, Engine};

/// How one slot (or array element) is copied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotCopy {
    /// The declared type is atomic: copy the value as-is.
    Bits,
    /// The declared type is an opaque leaf: share the reference.
    Share,
    /// Duplicate through the routine of the value's concrete runtime type.
    Dispatch,
}

impl SlotCopy {
    fn for_type(classifier: &Classifier<'_>, ty: Idx) -> Result<Self, CloneError> {
        let shape = classifier.classify(ty)?;
        Ok(if !shape.is_leaf() {
            SlotCopy::Dispatch
        } else if shape == Shape::Atomic {
            SlotCopy::Bits
        } else {
            SlotCopy::Share
        })
    }
}

/// A slot together with its copy strategy.
#[derive(Clone, Debug)]
pub struct SlotPlan {
    pub slot: SlotDesc,
    pub copy: SlotCopy,
}

/// The generated duplication plan of one type.
#[derive(Clone, Debug)]
pub enum Plan {
    /// Return the value unchanged (atomic shapes).
    BitCopy,
    /// Return the same reference (opaque leaves).
    Share,
    /// Allocate a fresh instance of the universal base. No slots to walk.
    EmptyRoot,
    /// Allocate an array of equal length and copy each element.
    Array { elem: Idx, copy: SlotCopy },
    /// Start from a zeroed record and copy each field.
    Record {
        template: RecordValue,
        slots: Vec<SlotPlan>,
    },
    /// Raw-allocate the class with zeroed slots and copy each slot.
    Object {
        template: Box<[Value]>,
        slots: Vec<SlotPlan>,
    },
}

/// A cached duplication routine for one concrete type.
#[derive(Debug)]
pub struct Routine {
    target: Idx,
    shape: Shape,
    plan: Plan,
}

impl Routine {
    /// Derive the routine for `ty`.
    ///
    /// Fails with [`CloneError::UnsupportedShape`] if `ty` or any of its slot
    /// types cannot be duplicated, regardless of what values they will hold.
    #[tracing::instrument(level = "debug", skip_all, fields(ty = %ty))]
    pub fn generate(classifier: &Classifier<'_>, ty: Idx) -> Result<Self, CloneError> {
        let pool = classifier.pool();
        let shape = classifier.classify(ty)?;

        let plan = match shape {
            Shape::Atomic => Plan::BitCopy,
            Shape::OpaqueLeaf => Plan::Share,
            Shape::ReferenceAggregate if ty == Idx::OBJECT => Plan::EmptyRoot,

            Shape::Array => {
                let elem = enumerate(pool, ty)?
                    .into_iter()
                    .find(SlotDesc::is_element)
                    .ok_or_else(|| CloneError::ContractViolation {
                        expected: format!("element slot for `{}`", pool.name(ty)),
                        found: "none".to_owned(),
                    })?;
                Plan::Array {
                    elem: elem.ty,
                    copy: SlotCopy::for_type(classifier, elem.ty)?,
                }
            }

            Shape::ValueAggregate => Plan::Record {
                template: RecordValue::zeroed(pool, ty)?,
                slots: plan_slots(classifier, enumerate(pool, ty)?)?,
            },

            Shape::ReferenceAggregate => {
                let slots = plan_slots(classifier, enumerate(pool, ty)?)?;
                let template = slots
                    .iter()
                    .map(|plan| Value::zeroed(pool, plan.slot.ty))
                    .collect::<Result<Box<[Value]>, _>>()?;
                Plan::Object { template, slots }
            }
        };

        tracing::debug!(name = %pool.name(ty), ?shape, "generated duplication routine");
        Ok(Routine {
            target: ty,
            shape,
            plan,
        })
    }

    pub fn target(&self) -> Idx {
        self.target
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Duplicate `value`, whose concrete type must be this routine's target.
    ///
    /// `depth` is the nesting level of `value` within the current call; slots
    /// dispatched from here are duplicated at `depth + 1`.
    pub fn invoke(&self, engine: &Engine<'_>, value: &Value, depth: usize) -> Result<Value, CloneError> {
        if value.runtime_type() != Some(self.target) {
            return Err(self.mismatch(engine, value));
        }

        match &self.plan {
            Plan::BitCopy => copy_leaf(engine, value, depth),
            Plan::Share => Ok(value.clone()),

            Plan::EmptyRoot => Ok(Value::Object(ObjectRef::allocate_raw(
                Idx::OBJECT,
                Box::default(),
            ))),

            Plan::Array { copy, .. } => {
                let Value::Array(src) = value else {
                    return Err(self.mismatch(engine, value));
                };
                // Snapshot releases the element lock before recursing.
                let elems = src
                    .snapshot()
                    .iter()
                    .map(|elem| copy_slot(engine, *copy, elem, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(ArrayRef::from_parts(
                    self.target,
                    Dims::from_slice(src.dims()),
                    elems,
                )))
            }

            Plan::Record { template, slots } => {
                let Value::Record(src) = value else {
                    return Err(self.mismatch(engine, value));
                };
                let mut dup = template.clone();
                copy_slots(engine, self.target, slots, src, &mut dup, depth)?;
                Ok(Value::Record(dup))
            }

            Plan::Object { template, slots } => {
                let Value::Object(src) = value else {
                    return Err(self.mismatch(engine, value));
                };
                let snapshot = src.snapshot();
                let mut dup = ObjectRef::allocate_raw(self.target, template.clone());
                copy_slots(engine, self.target, slots, snapshot.as_slice(), &mut dup, depth)?;
                Ok(Value::Object(dup))
            }
        }
    }

    fn mismatch(&self, engine: &Engine<'_>, value: &Value) -> CloneError {
        let pool = engine.pool();
        CloneError::ContractViolation {
            expected: pool.name(self.target),
            found: value
                .runtime_type()
                .map_or_else(|| "null".to_owned(), |ty| pool.name(ty)),
        }
    }
}

fn plan_slots(classifier: &Classifier<'_>, slots: Vec<SlotDesc>) -> Result<Vec<SlotPlan>, CloneError> {
    slots
        .into_iter()
        .map(|slot| {
            let copy = SlotCopy::for_type(classifier, slot.ty)?;
            Ok(SlotPlan { slot, copy })
        })
        .collect()
}

fn copy_slots<S, D>(
    engine: &Engine<'_>,
    target: Idx,
    slots: &[SlotPlan],
    src: &S,
    dst: &mut D,
    depth: usize,
) -> Result<(), CloneError>
where
    S: Slots + ?Sized,
    D: Slots + ?Sized,
{
    if src.slot_count() != slots.len() {
        return Err(CloneError::ContractViolation {
            expected: format!("{} slots for `{}`", slots.len(), engine.pool().name(target)),
            found: format!("{} slots", src.slot_count()),
        });
    }
    for plan in slots {
        let value = plan
            .slot
            .read(src)
            .ok_or_else(|| missing_slot(engine, &plan.slot))?;
        let copied = copy_slot(engine, plan.copy, &value, depth)?;
        if !plan.slot.write(dst, copied) {
            return Err(missing_slot(engine, &plan.slot));
        }
    }
    Ok(())
}

fn copy_slot(engine: &Engine<'_>, copy: SlotCopy, value: &Value, depth: usize) -> Result<Value, CloneError> {
    match copy {
        SlotCopy::Bits | SlotCopy::Share => copy_leaf(engine, value, depth),
        SlotCopy::Dispatch => engine.duplicate(value, depth + 1),
    }
}

/// Copy a value found under an atomic or opaque-leaf declaration.
///
/// Storage does not check values against declared slot types, so a slot
/// declared `int` may still hold an object. Heap references found here go
/// through their own routine; immutable objects come back shared from it.
fn copy_leaf(engine: &Engine<'_>, value: &Value, depth: usize) -> Result<Value, CloneError> {
    match value {
        Value::Object(_) | Value::Array(_) => engine.duplicate(value, depth + 1),
        Value::Record(record) if !is_inline(value) => {
            let mut dup = record.clone();
            for (index, field) in record.fields().iter().enumerate() {
                if !is_inline(field) {
                    dup.set_field(index, copy_leaf(engine, field, depth + 1)?);
                }
            }
            Ok(Value::Record(dup))
        }
        _ => Ok(value.clone()),
    }
}

/// Whether `value` holds no mutable heap storage at any nesting level.
fn is_inline(value: &Value) -> bool {
    match value {
        Value::Object(_) | Value::Array(_) => false,
        Value::Record(record) => record.fields().iter().all(is_inline),
        _ => true,
    }
}

fn missing_slot(engine: &Engine<'_>, slot: &SlotDesc) -> CloneError {
    CloneError::ContractViolation {
        expected: format!(
            "slot `{}` of `{}` at index {}",
            slot.name,
            engine.pool().name(slot.declaring),
            slot.index
        ),
        found: "no such slot".to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;

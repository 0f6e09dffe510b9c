//! Type pool: the registry of every type shape in the process.
//!
//! Shapes are append-only. Once an `Idx` is handed out it names the same
//! shape for the life of the pool; the only in-place update is completing a
//! forward-declared class, which happens exactly once.
//!
//! # Concurrency
//!
//! Storage sits behind `parking_lot::RwLock`. Lookups clone the stored
//! [`TypeData`] (cheap: definitions are `Arc`-shared) and release the lock
//! before doing any further work, so no method holds a lock while recursing
//! into another lookup.
//!
//! # Identity
//!
//! Records and classes are nominal: every definition gets a fresh `Idx`,
//! even when the name repeats. Arrays are structural: the same
//! `(elem, rank)` pair always resolves to the same `Idx`.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{ClassBuilder, ClassDef, FieldDef, Idx, RecordDef, TypeData, TypeError, TypeFlags};

/// Registry of type shapes addressed by [`Idx`].
pub struct Pool {
    types: RwLock<Vec<TypeData>>,
    /// Interned array shapes keyed by `(elem, rank)`.
    arrays: RwLock<FxHashMap<(Idx, u8), Idx>>,
}

impl Pool {
    /// Create a pool holding only the built-in shapes.
    pub fn new() -> Self {
        // Order must match the `Idx` constants.
        let builtins = vec![
            TypeData::Int,    // Idx::INT
            TypeData::Float,  // Idx::FLOAT
            TypeData::Bool,   // Idx::BOOL
            TypeData::Char,   // Idx::CHAR
            TypeData::Byte,   // Idx::BYTE
            TypeData::Unit,   // Idx::UNIT
            TypeData::Str,    // Idx::STR
            TypeData::Type,   // Idx::TYPE
            TypeData::Object, // Idx::OBJECT
        ];
        debug_assert_eq!(builtins.len(), Idx::BUILTIN_COUNT as usize);

        Pool {
            types: RwLock::new(builtins),
            arrays: RwLock::new(FxHashMap::default()),
        }
    }

    /// The process-wide pool, created on first use and never torn down.
    pub fn global() -> &'static Pool {
        static GLOBAL: OnceLock<Pool> = OnceLock::new();
        GLOBAL.get_or_init(Pool::new)
    }

    /// Number of registered shapes, built-ins included.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Always false: built-ins are registered at creation.
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Check if `idx` names a shape in this pool.
    pub fn contains(&self, idx: Idx) -> bool {
        idx.index() < self.types.read().len()
    }

    /// Look up a shape.
    pub fn get(&self, idx: Idx) -> Option<TypeData> {
        self.types.read().get(idx.index()).cloned()
    }

    /// Look up a shape, failing with [`TypeError::UnknownType`].
    pub fn try_get(&self, idx: Idx) -> Result<TypeData, TypeError> {
        self.get(idx).ok_or(TypeError::UnknownType(idx))
    }

    /// Human-readable name of a shape.
    ///
    /// Arrays render as `elem[]`, `elem[,]`, ... by rank.
    pub fn name(&self, idx: Idx) -> String {
        if let Some(name) = idx.name() {
            return name.to_owned();
        }
        match self.get(idx) {
            Some(TypeData::Record(def)) => def.name.clone(),
            Some(TypeData::Class(def)) => def.name.clone(),
            Some(TypeData::Forward { name }) => name,
            Some(TypeData::Array { elem, rank }) => {
                let commas = ",".repeat(usize::from(rank.saturating_sub(1)));
                format!("{}[{commas}]", self.name(elem))
            }
            Some(_) | None => idx.to_string(),
        }
    }

    fn push(&self, data: TypeData) -> Idx {
        let mut types = self.types.write();
        let idx = Idx::from_raw(to_raw(types.len()));
        types.push(data);
        idx
    }

    // === Definitions ===

    /// Define a record (value aggregate) with fields in declaration order.
    pub fn define_record(&self, name: &str, fields: &[(&str, Idx)]) -> Result<Idx, TypeError> {
        for &(_, ty) in fields {
            if !self.contains(ty) {
                return Err(TypeError::UnknownType(ty));
            }
        }
        let def = RecordDef {
            name: name.to_owned(),
            fields: fields
                .iter()
                .map(|&(field, ty)| FieldDef::new(field, ty))
                .collect(),
        };
        Ok(self.push(TypeData::Record(Arc::new(def))))
    }

    /// Reserve an `Idx` for a class whose definition comes later.
    ///
    /// Fields of other classes (or of the class itself) may refer to the
    /// returned index before [`complete_class`](Self::complete_class) runs.
    pub fn declare_class(&self, name: &str) -> Idx {
        self.push(TypeData::Forward {
            name: name.to_owned(),
        })
    }

    /// Supply the definition of a forward-declared class.
    pub fn complete_class(&self, idx: Idx, builder: ClassBuilder) -> Result<(), TypeError> {
        let mut types = self.types.write();

        match types.get(idx.index()) {
            Some(TypeData::Forward { .. }) => {}
            Some(other) => {
                let name = match other {
                    TypeData::Record(def) => def.name.clone(),
                    TypeData::Class(def) => def.name.clone(),
                    _ => idx.to_string(),
                };
                return Err(TypeError::NotForward(name));
            }
            None => return Err(TypeError::UnknownType(idx)),
        }

        let inherited = base_flags(&types, builder.name(), builder.base())?;
        for field in builder.fields() {
            if field.ty.index() >= types.len() {
                return Err(TypeError::UnknownType(field.ty));
            }
        }

        types[idx.index()] = TypeData::Class(Arc::new(builder.build(inherited)));
        Ok(())
    }

    /// Define a class in one step.
    pub fn define_class(&self, builder: ClassBuilder) -> Result<Idx, TypeError> {
        let idx = self.declare_class(builder.name());
        self.complete_class(idx, builder)?;
        Ok(idx)
    }

    /// Intern the array shape `elem` with `rank` dimensions.
    pub fn array(&self, elem: Idx, rank: u8) -> Result<Idx, TypeError> {
        if rank == 0 {
            return Err(TypeError::ZeroRank);
        }
        if !self.contains(elem) {
            return Err(TypeError::UnknownType(elem));
        }

        // Lock order: arrays, then types (inside `push`).
        let mut arrays = self.arrays.write();
        if let Some(&idx) = arrays.get(&(elem, rank)) {
            return Ok(idx);
        }
        let idx = self.push(TypeData::Array { elem, rank });
        arrays.insert((elem, rank), idx);
        Ok(idx)
    }

    // === Layout Queries ===

    /// The class chain of `idx`, base-most first, excluding the universal base.
    ///
    /// `Idx::OBJECT` yields an empty chain.
    pub fn class_chain(&self, idx: Idx) -> Result<Vec<(Idx, Arc<ClassDef>)>, TypeError> {
        let mut chain = Vec::new();
        let mut current = idx;
        loop {
            match self.try_get(current)? {
                TypeData::Object => break,
                TypeData::Class(def) => {
                    let base = def.base;
                    chain.push((current, def));
                    current = base;
                }
                other => {
                    return Err(TypeError::KindMismatch {
                        name: self.name(current),
                        expected: if matches!(other, TypeData::Forward { .. }) {
                            "completed class"
                        } else {
                            "class"
                        },
                    });
                }
            }
        }
        chain.reverse();
        Ok(chain)
    }

    /// Every slot of a record or class, in storage order.
    ///
    /// For classes this is the inherited slots first, base-most class first.
    pub fn slot_layout(&self, idx: Idx) -> Result<Vec<FieldDef>, TypeError> {
        match self.try_get(idx)? {
            TypeData::Record(def) => Ok(def.fields.clone()),
            TypeData::Object | TypeData::Class(_) => Ok(self
                .class_chain(idx)?
                .iter()
                .flat_map(|(_, def)| def.fields.iter().cloned())
                .collect()),
            other => Err(TypeError::KindMismatch {
                name: self.name(idx),
                expected: if matches!(other, TypeData::Forward { .. }) {
                    "completed class"
                } else {
                    "record or class"
                },
            }),
        }
    }

    /// Storage index of the slot called `field`.
    ///
    /// A slot declared on a subclass shadows a same-named inherited slot.
    pub fn field_index(&self, idx: Idx, field: &str) -> Option<usize> {
        self.slot_layout(idx)
            .ok()?
            .iter()
            .rposition(|slot| &*slot.name == field)
    }

    /// Flags of a class (empty for every other shape).
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        match self.get(idx) {
            Some(TypeData::Class(def)) => def.flags,
            _ => TypeFlags::empty(),
        }
    }

    /// Check whether `sub` is `sup` or derives from it.
    pub fn is_subclass(&self, sub: Idx, sup: Idx) -> bool {
        if sup == Idx::OBJECT {
            return matches!(self.get(sub), Some(TypeData::Object | TypeData::Class(_)));
        }
        self.class_chain(sub)
            .is_ok_and(|chain| chain.iter().any(|(idx, _)| *idx == sup))
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

fn base_flags(types: &[TypeData], name: &str, base: Idx) -> Result<TypeFlags, TypeError> {
    let base_name = || match types.get(base.index()) {
        Some(TypeData::Record(def)) => def.name.clone(),
        Some(TypeData::Class(def)) => def.name.clone(),
        Some(TypeData::Forward { name }) => name.clone(),
        _ => base.to_string(),
    };
    match types.get(base.index()) {
        Some(TypeData::Object) => Ok(TypeFlags::empty()),
        Some(TypeData::Class(def)) => Ok(def.flags),
        Some(TypeData::Forward { .. }) => Err(TypeError::IncompleteBase {
            name: name.to_owned(),
            base: base_name(),
        }),
        Some(_) => Err(TypeError::InvalidBase {
            name: name.to_owned(),
            base: base_name(),
        }),
        None => Err(TypeError::UnknownType(base)),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pool sizes beyond u32::MAX are not supported"
)]
fn to_raw(len: usize) -> u32 {
    len as u32
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;

//! Type shape definitions stored in the pool.

use std::fmt;
use std::sync::Arc;

use crate::{Idx, ObjectRef, TypeFlags};

/// User-defined construction logic for a class.
///
/// Runs during [`ObjectRef::new`] after slots are zeroed. It may have
/// arbitrary side effects, which is why duplication never calls it.
pub type Constructor = Arc<dyn Fn(&ObjectRef) + Send + Sync>;

/// The definition of one type shape.
#[derive(Clone, Debug)]
pub enum TypeData {
    Int,
    Float,
    Bool,
    Char,
    Byte,
    Unit,
    /// Immutable text.
    Str,
    /// Values that name a type.
    Type,
    /// The universal base class (no slots).
    Object,
    /// Value-semantic aggregate.
    Record(Arc<RecordDef>),
    /// Reference-semantic aggregate.
    Class(Arc<ClassDef>),
    /// Homogeneous array of `elem` with `rank` dimensions.
    Array { elem: Idx, rank: u8 },
    /// A class that has been declared but not yet completed.
    Forward { name: String },
}

/// A named slot in a record or class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: Arc<str>,
    pub ty: Idx,
}

impl FieldDef {
    pub fn new(name: &str, ty: Idx) -> Self {
        FieldDef {
            name: Arc::from(name),
            ty,
        }
    }
}

/// A record shape: fields are stored inline in the value.
#[derive(Clone, Debug)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

/// A class shape: instances live on the heap and are shared by reference.
///
/// `fields` holds only the slots declared on this class; inherited slots are
/// found by walking `base`.
#[derive(Clone)]
pub struct ClassDef {
    pub name: String,
    pub base: Idx,
    pub fields: Vec<FieldDef>,
    pub flags: TypeFlags,
    pub constructor: Option<Constructor>,
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("fields", &self.fields)
            .field("flags", &self.flags)
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Builder for class definitions.
///
/// ```text
/// let point = pool.define_class(
///     ClassBuilder::new("Point").field("x", Idx::INT).field("y", Idx::INT),
/// )?;
/// ```
#[derive(Clone)]
pub struct ClassBuilder {
    name: String,
    base: Idx,
    fields: Vec<FieldDef>,
    flags: TypeFlags,
    constructor: Option<Constructor>,
}

impl ClassBuilder {
    /// Start a class deriving directly from the universal base.
    pub fn new(name: impl Into<String>) -> Self {
        ClassBuilder {
            name: name.into(),
            base: Idx::OBJECT,
            fields: Vec::new(),
            flags: TypeFlags::empty(),
            constructor: None,
        }
    }

    /// Derive from `base` instead of the universal base.
    #[must_use]
    pub fn extends(mut self, base: Idx) -> Self {
        self.base = base;
        self
    }

    /// Append a slot.
    #[must_use]
    pub fn field(mut self, name: &str, ty: Idx) -> Self {
        self.fields.push(FieldDef::new(name, ty));
        self
    }

    /// Mark instances as immutable by contract.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.flags |= TypeFlags::IMMUTABLE;
        self
    }

    /// Attach user construction logic.
    #[must_use]
    pub fn constructor(mut self, ctor: impl Fn(&ObjectRef) + Send + Sync + 'static) -> Self {
        self.constructor = Some(Arc::new(ctor));
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn base(&self) -> Idx {
        self.base
    }

    pub(crate) fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub(crate) fn build(self, inherited: TypeFlags) -> ClassDef {
        ClassDef {
            name: self.name,
            base: self.base,
            fields: self.fields,
            flags: self.flags.inherit_from(inherited),
            constructor: self.constructor,
        }
    }
}

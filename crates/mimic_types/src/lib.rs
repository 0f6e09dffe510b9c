//! Runtime type model for mimic.
//!
//! This crate holds everything the duplication engine reflects over:
//!
//! - [`Idx`]: the 32-bit identity of a type shape
//! - [`Pool`]: the process-wide registry mapping `Idx` to [`TypeData`]
//! - [`Value`]: dynamically typed runtime values (scalars, records, objects,
//!   arrays)
//!
//! Records have value semantics and are copied inline. Objects and arrays
//! have reference semantics and are shared through `Arc`; copying a
//! [`Value`] never copies their storage.

mod data;
mod error;
mod flags;
mod idx;
mod pool;
mod value;

pub use data::{ClassBuilder, ClassDef, Constructor, FieldDef, RecordDef, TypeData};
pub use error::TypeError;
pub use flags::TypeFlags;
pub use idx::Idx;
pub use pool::Pool;
pub use value::{
    ArrayRef, Dims, Managed, ObjectRef, RecordValue, Slots, Value, ValueDisplay, MAX_DISPLAY_DEPTH,
};

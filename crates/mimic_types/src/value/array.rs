//! Heap arrays with reference semantics.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::{Idx, Pool, TypeData, TypeError};

use super::{Shallow, Value};

/// Array dimensions. Rank 1 and 2 stay inline.
pub type Dims = SmallVec<[usize; 2]>;

struct ArrayData {
    ty: Idx,
    dims: Dims,
    /// Row-major element storage; `len == dims.iter().product()`.
    elems: RwLock<Vec<Value>>,
}

/// Shared reference to a heap array.
///
/// The length is fixed at allocation; elements are mutable through any alias.
#[derive(Clone)]
pub struct ArrayRef(Arc<ArrayData>);

impl ArrayRef {
    /// A one-dimensional array of shape `ty`.
    pub fn new(pool: &Pool, ty: Idx, elems: Vec<Value>) -> Result<Self, TypeError> {
        let len = elems.len();
        Self::with_dims(pool, ty, &[len], elems)
    }

    /// An array of shape `ty` with explicit dimensions.
    pub fn with_dims(
        pool: &Pool,
        ty: Idx,
        dims: &[usize],
        elems: Vec<Value>,
    ) -> Result<Self, TypeError> {
        let rank = array_rank(pool, ty)?;
        if dims.len() != usize::from(rank) {
            return Err(TypeError::ArityMismatch {
                name: pool.name(ty),
                expected: usize::from(rank),
                found: dims.len(),
            });
        }
        let expected: usize = dims.iter().product();
        if expected != elems.len() {
            return Err(TypeError::ArityMismatch {
                name: pool.name(ty),
                expected,
                found: elems.len(),
            });
        }
        Ok(Self::from_parts(ty, SmallVec::from_slice(dims), elems))
    }

    /// An array of shape `ty` filled with the element type's zero value.
    pub fn zeroed(pool: &Pool, ty: Idx, dims: &[usize]) -> Result<Self, TypeError> {
        let elem = match pool.try_get(ty)? {
            TypeData::Array { elem, .. } => elem,
            _ => {
                return Err(TypeError::KindMismatch {
                    name: pool.name(ty),
                    expected: "array",
                })
            }
        };
        let zero = Value::zeroed(pool, elem)?;
        let len = dims.iter().product();
        Self::with_dims(pool, ty, dims, vec![zero; len])
    }

    /// Allocate directly from parts without consulting a pool.
    ///
    /// Callers guarantee that `elems.len()` equals the product of `dims`.
    pub fn from_parts(ty: Idx, dims: Dims, elems: Vec<Value>) -> Self {
        debug_assert_eq!(dims.iter().product::<usize>(), elems.len());
        ArrayRef(Arc::new(ArrayData {
            ty,
            dims,
            elems: RwLock::new(elems),
        }))
    }

    /// Concrete runtime array shape.
    pub fn ty(&self) -> Idx {
        self.0.ty
    }

    pub fn dims(&self) -> &[usize] {
        &self.0.dims
    }

    pub fn rank(&self) -> usize {
        self.0.dims.len()
    }

    /// Total number of elements across all dimensions.
    pub fn len(&self) -> usize {
        self.0.elems.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.elems.read().is_empty()
    }

    /// Read one element by flat index.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.elems.read().get(index).cloned()
    }

    /// Write one element by flat index. Returns `false` if out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.elems.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Copy of every element, taken under a single read lock.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.elems.read().clone()
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

fn array_rank(pool: &Pool, ty: Idx) -> Result<u8, TypeError> {
    match pool.try_get(ty)? {
        TypeData::Array { rank, .. } => Ok(rank),
        _ => Err(TypeError::KindMismatch {
            name: pool.name(ty),
            expected: "array",
        }),
    }
}

/// Structural equality: same shape, same dimensions, equal elements.
/// Structural equality. Like objects, unbounded through cyclic graphs.
impl PartialEq for ArrayRef {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.ty() == other.ty() && self.dims() == other.dims() && self.snapshot() == other.snapshot()
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("ty", &self.ty())
            .field("dims", &self.dims())
            .field("elems", &Shallow(&self.snapshot()))
            .finish()
    }
}

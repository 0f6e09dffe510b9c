//! Stack budget for recursive duplication.
//!
//! Every nesting level of a duplicated graph runs one dispatch, one routine
//! invocation and one slot copy on the native stack. On native targets each
//! step checks the remaining stack and moves onto a fresh `stacker` segment
//! when it falls below the red zone. On wasm the step runs in place and only
//! [`EngineConfig::max_depth`](crate::EngineConfig::max_depth) bounds it.

/// Red zone and segment size applied around each duplication step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackBudget {
    /// Remaining stack below which a new segment is allocated.
    pub red_zone: usize,
    /// Size of each newly allocated segment.
    pub segment: usize,
}

impl StackBudget {
    pub const DEFAULT_RED_ZONE: usize = 128 * 1024;
    pub const DEFAULT_SEGMENT: usize = 2 * 1024 * 1024;

    /// Run one duplication step, growing the stack first if needed.
    #[inline]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run<R>(self, step: impl FnOnce() -> R) -> R {
        stacker::maybe_grow(self.red_zone, self.segment, step)
    }

    #[inline]
    #[cfg(target_arch = "wasm32")]
    pub fn run<R>(self, step: impl FnOnce() -> R) -> R {
        step()
    }
}

impl Default for StackBudget {
    fn default() -> Self {
        StackBudget {
            red_zone: Self::DEFAULT_RED_ZONE,
            segment: Self::DEFAULT_SEGMENT,
        }
    }
}

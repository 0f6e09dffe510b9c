//! Structural deep duplication.
//!
//! Given any [`Value`] of the mimic object model, produce an independent copy
//! whose mutable storage shares nothing with the original. No user
//! constructor runs and no per-type copy code is written by hand.
//!
//! # Architecture
//!
//! ```text
//! deep_clone / deep_clone_any
//!         |
//!      Engine ──► RoutineCache ──hit──► Routine::invoke
//!         |            │ miss
//!         |            ▼
//!         |      Classifier ─► slots::enumerate ─► Routine::generate
//!         |            │
//!         └────────────┴── insert-if-absent, then invoke
//! ```
//!
//! Each concrete type is classified once, its routine is generated once, and
//! every later value of that type is duplicated through the cached routine.
//!
//! # Logging
//!
//! Routine generation is traced at `debug`, cache hits at `trace`. The
//! library only emits events; installing a subscriber is up to the caller.

mod cache;
mod classify;
mod config;
mod engine;
mod error;
mod routine;
pub mod slots;
mod stack;

pub use cache::{CacheStats, RoutineCache};
pub use classify::{Classifier, Shape};
pub use config::{EngineConfig, MAX_DEPTH_VAR};
pub use engine::Engine;
pub use error::{CloneError, UnsupportedReason};
pub use routine::{Plan, Routine, SlotCopy, SlotPlan};
pub use stack::StackBudget;

use mimic_types::{Managed, Value};

/// Duplicate `value` through the global engine.
///
/// `None` (and any other null reference) duplicates to itself.
pub fn deep_clone<T: Managed>(value: &T) -> Result<T, CloneError> {
    Engine::global().clone_typed(value)
}

/// Duplicate a dynamically typed value through the global engine.
pub fn deep_clone_any(value: &Value) -> Result<Value, CloneError> {
    Engine::global().clone_any(value)
}

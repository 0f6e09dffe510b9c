//! Dispatcher.
//!
//! Resolves the concrete runtime type of a value, fetches (or generates and
//! caches) that type's routine, and invokes it. Every nested slot that needs
//! more than a bit copy comes back through [`Engine::duplicate`], so
//! polymorphic slots always use the routine of the value they actually hold.

use std::sync::{Arc, OnceLock};

use mimic_types::{Idx, Managed, Pool, Value};

use crate::{Classifier, CloneError, EngineConfig, Routine, RoutineCache};

/// A duplication engine bound to one type pool.
///
/// The engine is shared freely between threads. Its routine cache and
/// classification memo live as long as the engine; the global engine lives
/// for the whole process.
pub struct Engine<'pool> {
    pool: &'pool Pool,
    classifier: Classifier<'pool>,
    cache: RoutineCache,
    config: EngineConfig,
}

impl<'pool> Engine<'pool> {
    pub fn new(pool: &'pool Pool, config: EngineConfig) -> Self {
        Engine {
            pool,
            classifier: Classifier::new(pool),
            cache: RoutineCache::new(),
            config,
        }
    }

    /// The process-wide engine over [`Pool::global`], configured from the
    /// environment on first use.
    pub fn global() -> &'static Engine<'static> {
        static GLOBAL: OnceLock<Engine<'static>> = OnceLock::new();
        GLOBAL.get_or_init(|| Engine::new(Pool::global(), EngineConfig::from_env()))
    }

    pub fn pool(&self) -> &'pool Pool {
        self.pool
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &RoutineCache {
        &self.cache
    }

    pub fn classifier(&self) -> &Classifier<'pool> {
        &self.classifier
    }

    /// Untyped entry point: duplicate any value.
    pub fn clone_any(&self, value: &Value) -> Result<Value, CloneError> {
        self.duplicate(value, 0)
    }

    /// Typed entry point: duplicate `value` and convert back to `T`.
    ///
    /// Goes through the same cache as [`clone_any`](Self::clone_any).
    pub fn clone_typed<T: Managed>(&self, value: &T) -> Result<T, CloneError> {
        let dup = self.clone_any(&value.to_value())?;
        let found = self.type_name_of(&dup);
        T::from_value(dup).ok_or_else(|| CloneError::ContractViolation {
            expected: std::any::type_name::<T>().to_owned(),
            found,
        })
    }

    /// The routine for `ty`, generating and caching it on first use.
    ///
    /// Generation runs with no cache lock held. When two threads generate the
    /// same type concurrently, both receive the one routine that was retained.
    pub fn routine_for(&self, ty: Idx) -> Result<Arc<Routine>, CloneError> {
        if let Some(routine) = self.cache.get(ty) {
            tracing::trace!(%ty, "routine cache hit");
            return Ok(routine);
        }
        let routine = Routine::generate(&self.classifier, ty)?;
        Ok(self.cache.insert_if_absent(ty, routine))
    }

    /// Duplicate `value` found at nesting level `depth`.
    pub(crate) fn duplicate(&self, value: &Value, depth: usize) -> Result<Value, CloneError> {
        let Some(ty) = value.runtime_type() else {
            return Ok(Value::Null);
        };
        if depth > self.config.max_depth {
            return Err(CloneError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        self.config.stack.run(|| {
            let routine = self.routine_for(ty)?;
            routine.invoke(self, value, depth)
        })
    }

    fn type_name_of(&self, value: &Value) -> String {
        value
            .runtime_type()
            .map_or_else(|| "null".to_owned(), |ty| self.pool.name(ty))
    }
}

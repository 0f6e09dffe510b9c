//! Engine configuration.

use crate::StackBudget;

/// Environment variable overriding [`EngineConfig::max_depth`].
pub const MAX_DEPTH_VAR: &str = "MIMIC_MAX_DEPTH";

/// Tunables for an [`Engine`](crate::Engine).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting of records, objects and arrays in one duplication.
    ///
    /// This bounds resource use for very deep graphs. It does not detect
    /// cycles: a cyclic object graph fails with
    /// [`CloneError::DepthExceeded`](crate::CloneError::DepthExceeded) once
    /// the limit is hit.
    pub max_depth: usize,
    /// Stack growth around each nesting level.
    pub stack: StackBudget,
}

impl EngineConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 100_000;

    /// Defaults, overridden by `MIMIC_MAX_DEPTH` when it parses.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(MAX_DEPTH_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => tracing::warn!(
                    value = %raw,
                    default = config.max_depth,
                    "ignoring invalid {MAX_DEPTH_VAR}"
                ),
            }
        }
        config
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: StackBudget) -> Self {
        self.stack = stack;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            stack: StackBudget::default(),
        }
    }
}

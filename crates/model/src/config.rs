use crate::error::{Result, YicesError};

/// Default bound on value-tree nesting during decoding.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Settings for value decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Deepest nesting of tuples, functions and mappings that
    /// `get_value` will follow before failing with
    /// [`YicesError::RecursionLimit`].
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// A depth of zero would reject every value, including leaves.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(YicesError::InternalError(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

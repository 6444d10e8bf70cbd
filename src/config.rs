use crate::{error::ConfigError, limits::Limits};

/// Top-level splitter configuration model.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultipartConfig {
    /// Structural limits for parts and header blocks.
    pub limits: Limits,
}

impl MultipartConfig {
    /// Creates a default, permissive configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()
    }
}

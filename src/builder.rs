use std::io::Read;

use crate::{
    config::MultipartConfig, error::ConfigError, limits::Limits, multipart::Multipart,
};

/// Builder for configuring a [`Multipart`] splitter.
#[derive(Debug, Clone, Default)]
pub struct MultipartBuilder {
    config: MultipartConfig,
}

impl MultipartBuilder {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current builder configuration snapshot.
    pub fn config(&self) -> &MultipartConfig {
        &self.config
    }

    /// Replaces the full builder configuration.
    pub fn with_config(mut self, config: MultipartConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets all structural limits at once.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Sets the maximum number of parts per message.
    pub fn max_parts(mut self, max_parts: usize) -> Self {
        self.config.limits.max_parts = Some(max_parts);
        self
    }

    /// Sets the maximum number of headers per part.
    pub fn max_headers(mut self, max_headers: usize) -> Self {
        self.config.limits.max_headers = Some(max_headers);
        self
    }

    /// Sets the maximum size of a single header line.
    pub fn max_header_size(mut self, max_header_size: u64) -> Self {
        self.config.limits.max_header_size = Some(max_header_size);
        self
    }

    /// Validates builder configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }

    /// Finalizes and returns validated configuration.
    pub fn build_config(self) -> Result<MultipartConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Builds a splitter over `reader` for the given boundary token.
    pub fn build<R: Read>(
        self,
        reader: R,
        boundary: impl AsRef<[u8]>,
    ) -> Result<Multipart<R>, ConfigError> {
        Multipart::with_config(reader, boundary, self.config)
    }
}

use crate::error::ConfigError;

/// Structural limits enforced while splitting a multipart message.
///
/// Every limit is optional; the default configuration accepts any input.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Limits {
    /// Maximum number of parts in one message.
    pub max_parts: Option<usize>,
    /// Maximum number of headers recorded for one part.
    pub max_headers: Option<usize>,
    /// Maximum size in bytes of a single header line (name and value).
    pub max_header_size: Option<u64>,
}

impl Limits {
    /// Creates a permissive limits configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that every configured limit is greater than zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parts == Some(0) {
            return Err(ConfigError::InvalidLimitValue { limit: "max_parts" });
        }
        if self.max_headers == Some(0) {
            return Err(ConfigError::InvalidLimitValue {
                limit: "max_headers",
            });
        }
        if self.max_header_size == Some(0) {
            return Err(ConfigError::InvalidLimitValue {
                limit: "max_header_size",
            });
        }
        Ok(())
    }

    pub(crate) fn allows_part(&self, yielded: usize) -> bool {
        let allowed = self.max_parts.map_or(true, |max| yielded < max);

        #[cfg(feature = "tracing")]
        if !allowed {
            tracing::debug!(
                yielded,
                max_parts = ?self.max_parts,
                "limits: part rejected by max_parts"
            );
        }

        allowed
    }
}

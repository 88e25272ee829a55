use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::ResourceLimits;

/// Errors raised when an export configuration violates its preconditions.
/// Validation happens once at the pipeline boundary; the core stages assume
/// well-formed inputs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unit display size must be positive")]
    InvalidUnitSize,

    #[error("requested display count must be at least 1, got {0}")]
    InvalidCount(u32),

    #[error("instruction budget must be positive")]
    InvalidInstructionBudget,

    #[error("buffer slots must be positive")]
    InvalidBufferSlots,
}

/// Configuration for one export run, fixed and shared read-only by all tiles.
///
/// `quality`, `use_hsv`, and `use_gray_transparency` are forwarded to the
/// rectangle extractor and do not affect the encoding or assembly stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Pixels per display edge; each tile is `unit_display_size` square.
    pub unit_display_size: u32,
    /// Number of display/processor pairs to generate.
    pub requested_count: u32,
    /// Maximum instruction lines per block before a flush must close it.
    pub instruction_budget: u32,
    /// Maximum queued drawing operations before a flush is required.
    pub buffer_slots: u32,
    /// Blend transparency toward gray instead of multiplying channels.
    pub use_gray_transparency: bool,
    /// Color quantization levels, 255 = lossless.
    pub quality: u8,
    /// Quantize in HSV space (only meaningful when quality < 255).
    pub use_hsv: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            unit_display_size: 80,
            requested_count: 1,
            instruction_budget: 1000,
            buffer_slots: 256,
            use_gray_transparency: false,
            quality: 255,
            use_hsv: false,
        }
    }
}

impl ExportConfig {
    /// Reject malformed configurations before the pipeline runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_display_size == 0 {
            return Err(ConfigError::InvalidUnitSize);
        }
        if self.requested_count == 0 {
            return Err(ConfigError::InvalidCount(self.requested_count));
        }
        if self.instruction_budget == 0 {
            return Err(ConfigError::InvalidInstructionBudget);
        }
        if self.buffer_slots == 0 {
            return Err(ConfigError::InvalidBufferSlots);
        }
        Ok(())
    }

    pub fn limits(&self) -> ResourceLimits {
        ResourceLimits {
            instruction_budget: self.instruction_budget,
            buffer_slots: self.buffer_slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ExportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_fields() {
        let mut c = ExportConfig::default();
        c.unit_display_size = 0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidUnitSize)));

        let mut c = ExportConfig::default();
        c.requested_count = 0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidCount(0))));

        let mut c = ExportConfig::default();
        c.instruction_budget = 0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidInstructionBudget)
        ));

        let mut c = ExportConfig::default();
        c.buffer_slots = 0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidBufferSlots)));
    }
}

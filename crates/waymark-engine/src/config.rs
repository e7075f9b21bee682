//! World configuration.

use waymark_core::ConfigError;
use waymark_sched::MAX_UPDATE_PASSES;

/// Tunable limits for a [`RouterWorld`](crate::RouterWorld).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Cap on update passes per node per settle, after which dispatch
    /// fails with `ScheduleError::ConvergenceExceeded`.
    pub max_update_passes: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_update_passes: MAX_UPDATE_PASSES,
        }
    }
}

impl WorldConfig {
    /// Check the configuration for construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_update_passes == 0 {
            return Err(ConfigError::ZeroUpdatePasses);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(WorldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_passes_is_rejected() {
        let config = WorldConfig {
            max_update_passes: 0,
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroUpdatePasses));
    }
}

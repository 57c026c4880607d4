use core::time::Duration;
use std::path::{Path, PathBuf};

use crate::{DEFAULT_EPOCH, DEFAULT_REGISTRY_PATH, Error, Result, SnowflakeProcessId};

/// Immutable configuration for an [`IdGenerator`].
///
/// Fixed at construction time and never mutated afterwards.
///
/// [`IdGenerator`]: crate::IdGenerator
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub(crate) machine_id: u64,
    pub(crate) epoch: Duration,
    pub(crate) registry_path: PathBuf,
}

impl GeneratorConfig {
    /// Creates a configuration for the given machine id.
    ///
    /// The machine id is assigned externally (there is no auto-discovery) and
    /// must be distinct per host, in `0..=255`. Validation happens at
    /// generator construction.
    pub fn new(machine_id: u64) -> Self {
        Self {
            machine_id,
            epoch: DEFAULT_EPOCH,
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
        }
    }

    /// Overrides the epoch offset subtracted from wall-clock time before
    /// packing.
    #[must_use]
    pub fn with_epoch(mut self, epoch: Duration) -> Self {
        self.epoch = epoch;
        self
    }

    /// Overrides the registry file location (default: relative path `pid`).
    #[must_use]
    pub fn with_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = path.into();
        self
    }

    /// Returns the configured machine id.
    pub fn machine_id(&self) -> u64 {
        self.machine_id
    }

    /// Returns the configured epoch offset.
    pub fn epoch(&self) -> Duration {
        self.epoch
    }

    /// Returns the configured registry file path.
    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.machine_id > SnowflakeProcessId::max_machine_id() {
            return Err(Error::MachineIdOutOfRange {
                machine_id: self.machine_id,
                max: SnowflakeProcessId::max_machine_id(),
            });
        }
        Ok(())
    }
}

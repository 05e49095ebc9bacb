use super::{InteropValidationError, RollupConfigSet};
use crate::safety_checker::LinkChecker;
use alloy_primitives::ChainId;
use kona_supervisor_types::DependencySet;
use std::time::Duration;

/// Default interval between two promotion attempts when no trigger arrives.
pub const DEFAULT_SAFETY_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration of the cross-chain safety checker.
#[derive(Debug, Clone)]
pub struct Config {
    /// The loaded dependency set configuration.
    pub dependency_set: DependencySet,

    /// The rollup configuration set.
    pub rollup_config_set: RollupConfigSet,

    /// Interval after which a worker retries a promotion without being triggered.
    pub safety_check_interval: Duration,
}

impl Config {
    /// Creates a new [`Config`] with the default safety check interval.
    pub const fn new(dependency_set: DependencySet, rollup_config_set: RollupConfigSet) -> Self {
        Self {
            dependency_set,
            rollup_config_set,
            safety_check_interval: DEFAULT_SAFETY_CHECK_INTERVAL,
        }
    }

    /// Sets the interval after which workers retry a promotion without being triggered.
    pub fn with_safety_check_interval(mut self, interval: Duration) -> Self {
        self.safety_check_interval = interval;
        self
    }

    /// Validates that a message initiated on `initiating_chain_id` at `initiating_timestamp` may
    /// be executed on `executing_chain_id` at `executing_timestamp`.
    pub fn validate_interop_timestamps(
        &self,
        initiating_chain_id: ChainId,
        initiating_timestamp: u64,
        executing_chain_id: ChainId,
        executing_timestamp: u64,
    ) -> Result<(), InteropValidationError> {
        for chain_id in [initiating_chain_id, executing_chain_id] {
            if !self.dependency_set.has_chain(chain_id) {
                return Err(InteropValidationError::UnknownChain(chain_id));
            }
        }

        // Interop must be active on both chains at the relevant times
        if !self.rollup_config_set.is_post_interop(initiating_chain_id, initiating_timestamp) ||
            !self.rollup_config_set.is_post_interop(executing_chain_id, executing_timestamp)
        {
            return Err(InteropValidationError::InteropNotEnabled);
        }

        // Executing timestamp must not be earlier than the initiating timestamp
        if initiating_timestamp > executing_timestamp {
            return Err(InteropValidationError::InvalidTimestampInvariant {
                initiating: initiating_timestamp,
                executing: executing_timestamp,
            });
        }

        // Ensure the message has not expired by the time of execution
        let expiry_window = self.dependency_set.get_message_expiry_window();
        if initiating_timestamp.saturating_add(expiry_window) < executing_timestamp {
            return Err(InteropValidationError::InvalidInteropTimestamp(executing_timestamp));
        }

        Ok(())
    }
}

impl LinkChecker for Config {
    fn can_execute(
        &self,
        executing_chain_id: ChainId,
        executing_timestamp: u64,
        initiating_chain_id: ChainId,
        initiating_timestamp: u64,
    ) -> bool {
        self.validate_interop_timestamps(
            initiating_chain_id,
            initiating_timestamp,
            executing_chain_id,
            executing_timestamp,
        )
        .is_ok()
    }
}

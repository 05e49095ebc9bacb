//! Configuration management for the cross-chain safety checker.

mod rollup_config_set;
pub use rollup_config_set::{RollupConfig, RollupConfigSet};

mod core_config;
pub use core_config::{Config, DEFAULT_SAFETY_CHECK_INTERVAL};

mod error;
pub use error::InteropValidationError;

use alloy_primitives::ChainId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default window, in seconds, after which an initiating message can no longer be executed.
pub const MESSAGE_EXPIRY_WINDOW: u64 = 7 * 24 * 60 * 60;

/// Configuration for a dependency of a chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDependency {}

/// Configuration for the dependency set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencySet {
    /// Dependencies information per chain.
    pub dependencies: HashMap<ChainId, ChainDependency>,

    /// Override message expiry window to use for this dependency set.
    #[serde(default)]
    pub override_message_expiry_window: Option<u64>,
}

impl DependencySet {
    /// Returns the message expiry window associated with this dependency set.
    pub const fn get_message_expiry_window(&self) -> u64 {
        match self.override_message_expiry_window {
            Some(window) if window > 0 => window,
            _ => MESSAGE_EXPIRY_WINDOW,
        }
    }

    /// Returns `true` if the chain is part of the dependency set.
    pub fn has_chain(&self, chain_id: ChainId) -> bool {
        self.dependencies.contains_key(&chain_id)
    }

    /// Returns the chain IDs of the dependency set in ascending order.
    pub fn chains(&self) -> Vec<ChainId> {
        let mut chains: Vec<_> = self.dependencies.keys().copied().collect();
        chains.sort_unstable();
        chains
    }
}

//! # Cross-Chain Block Safety Checker
//!
//! This module is responsible for verifying that all executing messages in a block
//! are based on dependencies that have reached the required safety level (e.g.,
//! [`CrossSafe`](op_alloy_consensus::interop::SafetyLevel)).
//!
//! A promotion attempt selects a candidate block, collects the blocks it depends on at the same
//! timestamp into a [`HazardSet`], checks that those blocks are close enough to the safety
//! frontier of their chains, and that their messages do not depend on each other in a cycle.
//! The candidate is only promoted if none of the data read during the attempt was rewound.
mod error;
pub use error::{CrossSafetyError, ValidationError};

mod traits;
pub use traits::{LinkChecker, SafetyPromoter};

mod hazard;
pub use hazard::{HazardSet, HazardTier};

mod cycle;
pub use cycle::{HazardGraph, check_hazard_cycles};

mod frontier;
pub use frontier::{check_safe_frontier, check_unsafe_frontier};

mod unsafe_update;
pub use unsafe_update::cross_unsafe_update;

mod safe_update;
pub use safe_update::{CrossSafeOutcome, cross_safe_update};

mod promoter;
pub use promoter::{CrossSafePromoter, CrossUnsafePromoter};

mod task;
pub use task::{CrossSafetyCheckerJob, PromotionTrigger};

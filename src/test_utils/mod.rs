//! Test utilities and mock implementations.
//!
//! This module provides reusable mock implementations of the node and
//! ledger contracts for use in unit and integration tests.

pub mod mocks;

pub use mocks::{IssuedAsset, MockConfig, MockNodeRpc, MockTransactionLog};

use crate::domain::AssetRequest;

/// A throwaway asset request with a unique name, the default quantity of
/// one, and a tenth-unit precision.
#[must_use]
pub fn sample_asset() -> AssetRequest {
    AssetRequest::new(uuid::Uuid::new_v4().simple().to_string(), 1, 0.1)
}

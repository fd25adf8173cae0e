//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of the node and ledger
//! contracts that can be configured to simulate success, failure, and
//! latency without a running node or database.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{
    Address, AssetBalance, AssetInfo, AssetRequest, ClientError, NewTransactionRecord, NodeRpc,
    RpcError, StoreError, TransactionId, TransactionLog, TransactionRecord,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }

    async fn simulate(&self) {
        if let Some(ms) = self.latency_ms {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }
    }
}

/// An issuance the mock node has accepted.
#[derive(Debug, Clone)]
pub struct IssuedAsset {
    pub chain: String,
    pub address: Address,
    pub name: String,
    pub quantity: u64,
    pub units: f64,
    pub txid: TransactionId,
}

/// Mock node for testing.
///
/// Accepts issuances into an in-memory list and answers queries from it,
/// without any network calls.
///
/// # Example
///
/// ```
/// use multichain_client::test_utils::{MockNodeRpc, mocks::MockConfig};
///
/// // A node that accepts everything
/// let node = MockNodeRpc::new();
///
/// // A node that rejects everything
/// let failing = MockNodeRpc::with_config(MockConfig::failure("RPC error"));
/// ```
pub struct MockNodeRpc {
    chain: String,
    issued: Arc<Mutex<Vec<IssuedAsset>>>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
    address_seq: AtomicU64,
}

impl MockNodeRpc {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chain("mockchain")
    }

    /// Creates a new mock configured for the given chain.
    #[must_use]
    pub fn with_chain(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            issued: Arc::new(Mutex::new(Vec::new())),
            config: MockConfig::success(),
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
            address_seq: AtomicU64::new(0),
        }
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Gets all accepted issuances.
    pub fn issued(&self) -> Vec<IssuedAsset> {
        self.issued.lock().unwrap().clone()
    }

    /// Clears all accepted issuances.
    pub fn clear(&self) {
        self.issued.lock().unwrap().clear();
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), ClientError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock node error".to_string());
            return Err(ClientError::Rpc(RpcError::Call {
                code: -1,
                message: msg,
            }));
        }
        Ok(())
    }

    fn next_txid() -> TransactionId {
        // Two v4 uuids give the 64 hex characters of a real txid.
        format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        )
    }
}

impl Default for MockNodeRpc {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeRpc for MockNodeRpc {
    fn chain_name(&self) -> &str {
        &self.chain
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.increment_call_count();
        self.config.simulate().await;

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(ClientError::Rpc(RpcError::Connection(
                "Mock node unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn issue_on(
        &self,
        chain: &str,
        address: &str,
        asset: &AssetRequest,
    ) -> Result<TransactionId, ClientError> {
        self.increment_call_count();
        self.config.simulate().await;
        self.check_should_fail()?;

        let txid = Self::next_txid();
        let mut issued = self.issued.lock().unwrap();
        issued.push(IssuedAsset {
            chain: chain.to_string(),
            address: address.to_string(),
            name: asset.name.clone(),
            quantity: asset.quantity,
            units: asset.units,
            txid: txid.clone(),
        });

        Ok(txid)
    }

    async fn asset_info_on(
        &self,
        chain: &str,
        asset: &str,
        _verbose: bool,
    ) -> Result<AssetInfo, ClientError> {
        self.increment_call_count();
        self.config.simulate().await;
        self.check_should_fail()?;

        let issued = self.issued.lock().unwrap();
        issued
            .iter()
            .find(|entry| entry.chain == chain && entry.name == asset)
            .map(|entry| AssetInfo {
                name: entry.name.clone(),
                issue_txid: entry.txid.clone(),
                asset_ref: Some(format!("0-0-{}", entry.quantity)),
                units: Some(entry.units),
                open: Some(false),
                details: None,
            })
            .ok_or_else(|| {
                ClientError::Rpc(RpcError::Call {
                    code: -708,
                    message: "Entity with this name not found".to_string(),
                })
            })
    }

    async fn address_balances_on(
        &self,
        chain: &str,
        address: &str,
    ) -> Result<Vec<AssetBalance>, ClientError> {
        self.increment_call_count();
        self.config.simulate().await;
        self.check_should_fail()?;

        let issued = self.issued.lock().unwrap();
        Ok(issued
            .iter()
            .filter(|entry| entry.chain == chain && entry.address == address)
            .map(|entry| AssetBalance {
                name: entry.name.clone(),
                asset_ref: None,
                qty: entry.quantity as f64,
            })
            .collect())
    }

    async fn new_address_on(&self, _chain: &str) -> Result<Address, ClientError> {
        self.increment_call_count();
        self.config.simulate().await;
        self.check_should_fail()?;

        let seq = self.address_seq.fetch_add(1, Ordering::Relaxed);
        Ok(format!("1Mock{:04}", seq))
    }
}

/// Mock transaction log for testing.
///
/// Uses an in-memory list for storage and supports configurable failure
/// modes, preserving the duplicate-key behavior of the real store.
///
/// # Example
///
/// ```
/// use multichain_client::test_utils::{MockTransactionLog, mocks::MockConfig};
///
/// let log = MockTransactionLog::new();
/// let failing = MockTransactionLog::with_config(MockConfig::failure("store error"));
/// ```
pub struct MockTransactionLog {
    storage: Arc<Mutex<Vec<TransactionRecord>>>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockTransactionLog {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            storage: Arc::new(Mutex::new(Vec::new())),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Gets all stored records in insertion order.
    pub fn records(&self) -> Vec<TransactionRecord> {
        self.storage.lock().unwrap().clone()
    }

    /// Clears all stored records.
    pub fn clear(&self) {
        self.storage.lock().unwrap().clear();
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), ClientError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock store error".to_string());
            return Err(ClientError::Store(StoreError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockTransactionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionLog for MockTransactionLog {
    async fn health_check(&self) -> Result<(), ClientError> {
        self.increment_call_count();
        self.config.simulate().await;

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(ClientError::Store(StoreError::Connection(
                "Mock store unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn create(&self, record: &NewTransactionRecord) -> Result<TransactionRecord, ClientError> {
        self.increment_call_count();
        self.config.simulate().await;
        self.check_should_fail()?;

        let mut storage = self.storage.lock().unwrap();

        let duplicate = storage.iter().any(|existing| {
            existing.chain_name == record.chain_name
                && existing.method == record.method
                && existing.txid == record.txid
        });
        if duplicate {
            return Err(ClientError::Store(StoreError::Duplicate(format!(
                "({}, {}, {})",
                record.chain_name, record.method, record.txid
            ))));
        }

        let now = Utc::now();
        let stored = TransactionRecord {
            id: format!("txn_{}", uuid::Uuid::new_v4()),
            chain_name: record.chain_name.clone(),
            method: record.method.clone(),
            txid: record.txid.clone(),
            created_by: record.actor.clone(),
            last_modified_by: record.actor.clone(),
            created_at: now,
            updated_at: now,
        };

        storage.push(stored.clone());
        Ok(stored)
    }

    async fn find(
        &self,
        chain_name: &str,
        method: &str,
        txid: &str,
    ) -> Result<Option<TransactionRecord>, ClientError> {
        self.increment_call_count();
        self.config.simulate().await;
        self.check_should_fail()?;

        let storage = self.storage.lock().unwrap();
        Ok(storage
            .iter()
            .find(|record| {
                record.chain_name == chain_name && record.method == method && record.txid == txid
            })
            .cloned())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<TransactionRecord>, ClientError> {
        self.increment_call_count();
        self.config.simulate().await;
        self.check_should_fail()?;

        let limit = limit.clamp(1, 500) as usize;
        let storage = self.storage.lock().unwrap();
        Ok(storage.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::methods;

    #[tokio::test]
    async fn test_mock_node_issue_and_query() {
        let node = MockNodeRpc::with_chain("main");

        let asset = AssetRequest::new("bond", 250, 0.1);
        let txid = node.issue("1Addr", &asset).await.unwrap();
        assert_eq!(txid.len(), 64);

        let issued = node.issued();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].chain, "main");

        let info = node.asset_info("bond", false).await.unwrap();
        assert_eq!(info.issue_txid, txid);

        let balances = node.address_balances("1Addr").await.unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].qty, 250.0);
    }

    #[tokio::test]
    async fn test_mock_node_unknown_asset() {
        let node = MockNodeRpc::new();
        let result = node.asset_info("ghost", false).await;
        assert!(matches!(
            result.unwrap_err(),
            ClientError::Rpc(RpcError::Call { code: -708, .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_node_failure() {
        let node = MockNodeRpc::failing("RPC timeout");

        let asset = AssetRequest::new("bond", 1, 1.0);
        let result = node.issue("1Addr", &asset).await;
        assert!(result.is_err());
        assert!(node.issued().is_empty());
    }

    #[tokio::test]
    async fn test_mock_node_fresh_addresses_are_unique() {
        let node = MockNodeRpc::new();
        let a = node.new_address().await.unwrap();
        let b = node.new_address().await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_mock_log_create_and_find() {
        let log = MockTransactionLog::new();
        let record = NewTransactionRecord::new("main", methods::ISSUE, "00ff");

        let created = log.create(&record).await.unwrap();
        assert!(created.id.starts_with("txn_"));

        let fetched = log.find("main", "issue", "00ff").await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);

        let missing = log.find("main", "issue", "beef").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_mock_log_rejects_duplicates() {
        let log = MockTransactionLog::new();
        let record = NewTransactionRecord::new("main", methods::ISSUE, "00ff");

        log.create(&record).await.unwrap();
        let result = log.create(&record).await;

        assert!(matches!(
            result.unwrap_err(),
            ClientError::Store(StoreError::Duplicate(_))
        ));
        assert_eq!(log.records().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_log_recent_is_newest_first() {
        let log = MockTransactionLog::new();
        for i in 0..5 {
            let record = NewTransactionRecord::new("main", methods::ISSUE, format!("tx{}", i));
            log.create(&record).await.unwrap();
        }

        let recent = log.recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].txid, "tx4");
        assert_eq!(recent[2].txid, "tx2");
    }

    #[tokio::test]
    async fn test_mock_call_count() {
        let log = MockTransactionLog::new();
        assert_eq!(log.call_count(), 0);

        let _ = log.health_check().await;
        assert_eq!(log.call_count(), 1);

        let _ = log.find("a", "b", "c").await;
        assert_eq!(log.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_latency_is_applied() {
        let node = MockNodeRpc::with_config(MockConfig::success().with_latency(10));

        let start = std::time::Instant::now();
        node.ping().await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn test_mock_health_toggle() {
        let node = MockNodeRpc::new();
        let log = MockTransactionLog::new();

        assert!(tokio_test::block_on(node.ping()).is_ok());
        assert!(tokio_test::block_on(log.health_check()).is_ok());

        node.set_healthy(false);
        log.set_healthy(false);

        assert!(tokio_test::block_on(node.ping()).is_err());
        assert!(tokio_test::block_on(log.health_check()).is_err());
    }
}

//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::ClientError;
use super::types::{
    Address, AssetBalance, AssetInfo, AssetRequest, NewTransactionRecord, TransactionId,
    TransactionRecord,
};

/// Node RPC contract for issuance and wallet queries.
///
/// Every operation exists in two forms: `*_on` takes the chain name
/// explicitly, while the short form infers it from the client's configured
/// chain. The provided default methods make the two paths equivalent by
/// construction.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// The chain inferred-path calls are routed to.
    fn chain_name(&self) -> &str;

    /// Check node RPC connectivity.
    async fn ping(&self) -> Result<(), ClientError>;

    /// Issue a new asset on the given chain, crediting `address`.
    async fn issue_on(
        &self,
        chain: &str,
        address: &str,
        asset: &AssetRequest,
    ) -> Result<TransactionId, ClientError>;

    /// Issue a new asset on the configured chain.
    async fn issue(&self, address: &str, asset: &AssetRequest) -> Result<TransactionId, ClientError> {
        let chain = self.chain_name().to_owned();
        self.issue_on(&chain, address, asset).await
    }

    /// Look up an asset by name, ref, or issuance txid.
    async fn asset_info_on(
        &self,
        chain: &str,
        asset: &str,
        verbose: bool,
    ) -> Result<AssetInfo, ClientError>;

    async fn asset_info(&self, asset: &str, verbose: bool) -> Result<AssetInfo, ClientError> {
        let chain = self.chain_name().to_owned();
        self.asset_info_on(&chain, asset, verbose).await
    }

    /// Per-asset balances held by an address.
    async fn address_balances_on(
        &self,
        chain: &str,
        address: &str,
    ) -> Result<Vec<AssetBalance>, ClientError>;

    async fn address_balances(&self, address: &str) -> Result<Vec<AssetBalance>, ClientError> {
        let chain = self.chain_name().to_owned();
        self.address_balances_on(&chain, address).await
    }

    /// Ask the node wallet for a fresh receiving address.
    async fn new_address_on(&self, chain: &str) -> Result<Address, ClientError>;

    async fn new_address(&self) -> Result<Address, ClientError> {
        let chain = self.chain_name().to_owned();
        self.new_address_on(&chain).await
    }
}

/// Persistence contract for the transaction audit ledger.
#[async_trait]
pub trait TransactionLog: Send + Sync {
    /// Check store connectivity.
    async fn health_check(&self) -> Result<(), ClientError>;

    /// Persist a new record. Inserting the same (chain, method, txid) key
    /// twice surfaces as [`super::error::StoreError::Duplicate`].
    async fn create(&self, record: &NewTransactionRecord) -> Result<TransactionRecord, ClientError>;

    /// Fetch a record by its natural key.
    async fn find(
        &self,
        chain_name: &str,
        method: &str,
        txid: &str,
    ) -> Result<Option<TransactionRecord>, ClientError>;

    /// Most recently created records, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<TransactionRecord>, ClientError>;
}

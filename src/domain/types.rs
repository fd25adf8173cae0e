use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Transaction id returned by the node for a committed operation.
pub type TransactionId = String;

/// Wallet address on a chain.
pub type Address = String;

/// RPC method names recorded alongside ledger entries.
pub mod methods {
    pub const GET_INFO: &str = "getinfo";
    pub const ISSUE: &str = "issue";
    pub const GET_ASSET_INFO: &str = "getassetinfo";
    pub const GET_ADDRESS_BALANCES: &str = "getaddressbalances";
    pub const GET_NEW_ADDRESS: &str = "getnewaddress";
}

/// Parameters for a single asset issuance.
///
/// `units` is the smallest displayable fraction of the asset (0.01 means the
/// asset is divisible to two decimal places). `quantity` counts raw units.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AssetRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    #[validate(range(min = 1))]
    pub quantity: u64,
    pub units: f64,
    pub open: bool,
    #[serde(default)]
    pub custom_fields: HashMap<String, String>,
}

impl AssetRequest {
    pub fn new(name: impl Into<String>, quantity: u64, units: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            units,
            open: false,
            custom_fields: HashMap::new(),
        }
    }

    /// Allow follow-on issuances of the same asset.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }
}

/// Service-level issuance request.
///
/// Without a chain the call goes down the inferred path and uses the chain
/// the node client was configured with. Without a target address the service
/// falls back to its default address or asks the node for a fresh one.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub chain: Option<String>,
    pub to: Option<Address>,
    pub asset: AssetRequest,
}

impl IssueRequest {
    pub fn new(asset: AssetRequest) -> Self {
        Self {
            chain: None,
            to: None,
            asset,
        }
    }

    pub fn on_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub fn to(mut self, address: impl Into<Address>) -> Self {
        self.to = Some(address.into());
        self
    }
}

/// Outcome envelope of an issuance call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueResult {
    pub success: bool,
    pub txid: Option<TransactionId>,
    pub message: String,
}

impl IssueResult {
    pub fn success(txid: TransactionId) -> Self {
        Self {
            success: true,
            txid: Some(txid),
            message: "Asset issued successfully".to_string(),
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            txid: None,
            message,
        }
    }
}

/// Issuance outcome together with the ledger record written for it.
#[derive(Debug, Clone)]
pub struct IssueReceipt {
    pub outcome: IssueResult,
    pub record: TransactionRecord,
}

/// Audit record of a transaction produced through this client.
///
/// Keyed by (chain name, method, txid); the surrogate id exists for storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: String,
    pub chain_name: String,
    pub method: String,
    pub txid: TransactionId,
    pub created_by: String,
    pub last_modified_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a [`TransactionRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransactionRecord {
    pub chain_name: String,
    pub method: String,
    pub txid: TransactionId,
    pub actor: String,
}

impl NewTransactionRecord {
    pub fn new(
        chain_name: impl Into<String>,
        method: impl Into<String>,
        txid: impl Into<TransactionId>,
    ) -> Self {
        Self {
            chain_name: chain_name.into(),
            method: method.into(),
            txid: txid.into(),
            actor: "multichain-client".to_string(),
        }
    }

    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}

/// Asset description as reported by `getassetinfo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetInfo {
    pub name: String,
    #[serde(rename = "issuetxid")]
    pub issue_txid: TransactionId,
    #[serde(rename = "assetref")]
    pub asset_ref: Option<String>,
    pub units: Option<f64>,
    pub open: Option<bool>,
    pub details: Option<serde_json::Value>,
}

/// One row of a `getaddressbalances` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetBalance {
    pub name: String,
    #[serde(rename = "assetref")]
    pub asset_ref: Option<String>,
    pub qty: f64,
}

/// Health check status for services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Combined health of the node connection and the transaction store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub node: HealthStatus,
    pub store: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(node: HealthStatus, store: HealthStatus) -> Self {
        let status = match (&node, &store) {
            (HealthStatus::Healthy, HealthStatus::Healthy) => HealthStatus::Healthy,
            (HealthStatus::Unhealthy, _) | (_, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
            _ => HealthStatus::Degraded,
        };

        Self {
            status,
            node,
            store,
            timestamp: Utc::now(),
        }
    }
}

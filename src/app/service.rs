//! Application service layer.
//!
//! Orchestrates the issue-then-record workflow between the node client and
//! the transaction log using trait abstractions.

use metrics::counter;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::{
    Address, AssetInfo, ClientError, HealthResponse, HealthStatus, IssueReceipt, IssueRequest,
    IssueResult, NewTransactionRecord, NodeRpc, TransactionLog, ValidationError, methods,
};

/// Service orchestrating asset issuance and ledger recording.
///
/// Holds references to the trait abstractions, enabling dependency
/// injection and testability.
///
/// # Example
///
/// ```ignore
/// let node = Arc::new(HttpNodeClient::with_defaults(&options)?);
/// let log = Arc::new(PostgresTransactionLog::connect(&db_options).await?);
/// let service = AssetService::new(node, log);
///
/// let receipt = service.issue_asset(&request).await?;
/// ```
pub struct AssetService {
    node: Arc<dyn NodeRpc>,
    transaction_log: Arc<dyn TransactionLog>,
    default_address: Option<Address>,
    actor: String,
}

impl AssetService {
    #[must_use]
    pub fn new(node: Arc<dyn NodeRpc>, transaction_log: Arc<dyn TransactionLog>) -> Self {
        Self {
            node,
            transaction_log,
            default_address: None,
            actor: "multichain-client".to_string(),
        }
    }

    /// Address issuances are credited to when the request names none.
    /// Typically the chain's admin address.
    #[must_use]
    pub fn with_default_address(mut self, address: impl Into<Address>) -> Self {
        self.default_address = Some(address.into());
        self
    }

    /// Audit identity stamped on ledger records created by this service.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Issues an asset and records the resulting transaction.
    ///
    /// The workflow:
    /// 1. Validate the asset parameters
    /// 2. Resolve the target address (request, default, or a fresh one)
    /// 3. Issue on the explicit chain, or the configured chain if none given
    /// 4. Persist a ledger record keyed by (chain, method, txid)
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if validation fails, the node rejects the
    /// issuance, or the ledger write fails. An RPC failure aborts the
    /// workflow before anything is persisted.
    #[instrument(skip(self, request), fields(asset_name = %request.asset.name))]
    pub async fn issue_asset(&self, request: &IssueRequest) -> Result<IssueReceipt, ClientError> {
        request.asset.validate().map_err(|e| {
            warn!(error = %e, "Validation failed for issuance request");
            ClientError::Validation(ValidationError::Multiple(e.to_string()))
        })?;

        let to = self.resolve_target(request).await?;

        let issued = match request.chain.as_deref() {
            Some(chain) => self.node.issue_on(chain, &to, &request.asset).await,
            None => self.node.issue(&to, &request.asset).await,
        };

        let txid = match issued {
            Ok(txid) => {
                counter!("asset_issuance_total", "outcome" => "success").increment(1);
                info!(txid = %txid, address = %to, "Asset issued");
                txid
            }
            Err(e) => {
                counter!("asset_issuance_total", "outcome" => "failure").increment(1);
                warn!(error = ?e, "Asset issuance failed");
                return Err(e);
            }
        };

        let chain_name = request
            .chain
            .clone()
            .unwrap_or_else(|| self.node.chain_name().to_string());

        let record = self
            .transaction_log
            .create(
                &NewTransactionRecord::new(chain_name, methods::ISSUE, txid.clone())
                    .by(self.actor.as_str()),
            )
            .await?;
        info!(record_id = %record.id, "Transaction recorded");

        Ok(IssueReceipt {
            outcome: IssueResult::success(txid),
            record,
        })
    }

    /// Looks up an asset on the explicit chain, or the configured one.
    #[instrument(skip(self))]
    pub async fn asset_info(
        &self,
        chain: Option<&str>,
        asset: &str,
        verbose: bool,
    ) -> Result<AssetInfo, ClientError> {
        match chain {
            Some(chain) => self.node.asset_info_on(chain, asset, verbose).await,
            None => self.node.asset_info(asset, verbose).await,
        }
    }

    /// Performs a health check on the node and the transaction store.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let node_health = match self.node.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Node health check failed");
                HealthStatus::Unhealthy
            }
        };

        let store_health = match self.transaction_log.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Store health check failed");
                HealthStatus::Unhealthy
            }
        };

        HealthResponse::new(node_health, store_health)
    }

    async fn resolve_target(&self, request: &IssueRequest) -> Result<Address, ClientError> {
        if let Some(to) = &request.to {
            return Ok(to.clone());
        }
        if let Some(default) = &self.default_address {
            return Ok(default.clone());
        }
        match request.chain.as_deref() {
            Some(chain) => self.node.new_address_on(chain).await,
            None => self.node.new_address().await,
        }
    }
}

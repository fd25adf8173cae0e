//! Service container wiring.
//!
//! `AppState` is the composition root: it accepts any `NodeRpc` and
//! `TransactionLog` implementation and can bootstrap concrete adapters from
//! each supported configuration source.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{ClientError, NodeRpc, TransactionLog};
use crate::infra::{HttpNodeClient, PostgresTransactionLog};

use super::service::AssetService;

/// Shared container holding the wired service and its collaborators.
///
/// All contained types are wrapped in `Arc` and implement `Send + Sync`,
/// making `AppState` safe to share across async tasks.
///
/// # Example
///
/// ```ignore
/// let node = Arc::new(HttpNodeClient::with_defaults(&options)?);
/// let log = Arc::new(PostgresTransactionLog::connect(&db_options).await?);
/// let state = AppState::new(node, log);
///
/// let receipt = state.service.issue_asset(&request).await?;
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The application service containing the issuance workflow.
    pub service: Arc<AssetService>,

    /// Node client for chain operations.
    pub node: Arc<dyn NodeRpc>,

    /// Transaction log for persistence operations.
    pub transaction_log: Arc<dyn TransactionLog>,
}

impl AppState {
    /// Creates a container around the provided implementations.
    ///
    /// This constructor also creates the `AssetService` internally,
    /// wiring it to the provided clients.
    #[must_use]
    pub fn new(node: Arc<dyn NodeRpc>, transaction_log: Arc<dyn TransactionLog>) -> Self {
        let service = Arc::new(AssetService::new(
            Arc::clone(&node),
            Arc::clone(&transaction_log),
        ));

        Self {
            service,
            node,
            transaction_log,
        }
    }

    /// Creates a container with a custom, pre-configured service.
    #[must_use]
    pub fn with_service(
        service: Arc<AssetService>,
        node: Arc<dyn NodeRpc>,
        transaction_log: Arc<dyn TransactionLog>,
    ) -> Self {
        Self {
            service,
            node,
            transaction_log,
        }
    }

    /// Builds concrete adapters from the given configuration.
    ///
    /// Requires a `database` section; its migration mode is honored while
    /// connecting. The node's admin address, when configured, becomes the
    /// service's default issuance target.
    pub async fn connect(config: &AppConfig) -> Result<Self, ClientError> {
        let node: Arc<dyn NodeRpc> = Arc::new(HttpNodeClient::with_defaults(&config.node)?);

        let database = config.require_database()?;
        let transaction_log: Arc<dyn TransactionLog> =
            Arc::new(PostgresTransactionLog::connect(database).await?);

        let mut service = AssetService::new(Arc::clone(&node), Arc::clone(&transaction_log));
        if let Some(admin) = &config.node.admin_address {
            service = service.with_default_address(admin.clone());
        }

        Ok(Self::with_service(Arc::new(service), node, transaction_log))
    }

    /// Bootstraps from environment variables (honoring `.env`).
    pub async fn from_env() -> Result<Self, ClientError> {
        Self::connect(&AppConfig::from_env()?).await
    }

    /// Bootstraps from a JSON configuration file.
    pub async fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self, ClientError> {
        Self::connect(&AppConfig::from_json_file(path)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockNodeRpc, MockTransactionLog};

    #[test]
    fn test_app_state_creation() {
        let node = Arc::new(MockNodeRpc::new());
        let log = Arc::new(MockTransactionLog::new());

        let state = AppState::new(node, log);

        assert!(Arc::strong_count(&state.service) >= 1);
    }

    #[test]
    fn test_app_state_is_clone() {
        let node = Arc::new(MockNodeRpc::new());
        let log = Arc::new(MockTransactionLog::new());

        let state = AppState::new(node, log);
        let cloned = state.clone();

        // Both should point to the same service
        assert!(Arc::ptr_eq(&state.service, &cloned.service));
    }
}

//! Domain layer containing core types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ClientError, ConfigError, RpcError, StoreError, ValidationError};
pub use traits::{NodeRpc, TransactionLog};
pub use types::{
    Address, AssetBalance, AssetInfo, AssetRequest, HealthResponse, HealthStatus, IssueReceipt,
    IssueRequest, IssueResult, NewTransactionRecord, TransactionId, TransactionRecord, methods,
};

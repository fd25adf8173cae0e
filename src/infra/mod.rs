//! Infrastructure layer implementations.

pub mod database;
pub mod observability;
pub mod rpc;

pub use database::{PostgresConfig, PostgresTransactionLog};
pub use rpc::{HttpNodeClient, RpcClientConfig};

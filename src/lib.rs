//! Client library for MultiChain-style blockchain nodes.
//!
//! The crate wires two external collaborators together behind trait
//! abstractions: a JSON-RPC node that issues assets and answers wallet
//! queries, and a relational store that keeps an audit record of every
//! transaction the client produced.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Application Layer               │
//! │   Service orchestration, container wiring    │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Traits, types, errors (no dependencies)    │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │   JSON-RPC node adapter, Postgres ledger     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Trait-based abstraction**: the node and the ledger are consumed
//!   through [`domain::NodeRpc`] and [`domain::TransactionLog`]
//! - **Dependency injection**: [`app::AppState`] accepts any implementation,
//!   concrete or mock, and can bootstrap itself from explicit options, a JSON
//!   configuration file, environment variables, or a secrets directory
//! - **Two call paths**: every node operation exists in an explicit-chain and
//!   an inferred-chain form, the latter delegating to the configured chain
//! - **Security**: credentials are held in `secrecy` types and never logged
//!
//! # Example
//!
//! ```ignore
//! use multichain_client::app::AppState;
//! use multichain_client::config::AppConfig;
//! use multichain_client::domain::{AssetRequest, IssueRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let state = AppState::connect(&config).await?;
//!
//!     let asset = AssetRequest::new("demo-asset", 1000, 0.01);
//!     let receipt = state.service.issue_asset(&IssueRequest::new(asset)).await?;
//!     println!("issued {}", receipt.outcome.txid.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

//! Concrete transaction log implementations.
//!
//! This module contains production-ready store adapters that implement
//! the `TransactionLog` trait defined in the domain layer.

pub mod postgres;

pub use postgres::{PostgresConfig, PostgresTransactionLog};

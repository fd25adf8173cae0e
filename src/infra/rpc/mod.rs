//! Node RPC client implementations.

pub mod client;

pub use client::{HttpNodeClient, RpcClientConfig};

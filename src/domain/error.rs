//! Client error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RpcError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("RPC call failed ({code}): {message}")]
    Call { code: i64, message: String },
    #[error("Node returned an empty result")]
    EmptyResult,
    #[error("Insufficient funds or permissions")]
    InsufficientFunds,
    #[error("Timed out waiting for the node: {0}")]
    Timeout(String),
}

#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Duplicate record: {0}")]
    Duplicate(String),
    #[error("Pool exhausted: {0}")]
    PoolExhausted(String),
    #[error("Migration failed: {0}")]
    Migration(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Missing secret: {0}")]
    MissingSecret(String),
    #[error("Missing configuration section: {0}")]
    MissingSection(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<&str> for ConfigError {
    fn from(s: &str) -> Self {
        ConfigError::Parse(s.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Validation failed: {0}")]
    Multiple(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::Validation(ValidationError::Multiple(err.to_string()))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted("Pool timed out".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.code().is_some_and(|code| code == "23505") {
                    return StoreError::Duplicate(db_err.message().to_string());
                }
                StoreError::Query(db_err.message().to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for ClientError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        ClientError::Store(StoreError::Migration(err.to_string()))
    }
}

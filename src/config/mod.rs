//! Configuration layer.
//!
//! Options can come from four sources: explicit construction in code, a JSON
//! configuration document, `MULTICHAIN_*`/`DATABASE_*` environment variables
//! (with `.env` support), or a secrets directory with one file per key.

use std::path::Path;

use serde::Deserialize;
use validator::Validate;

use crate::domain::{ClientError, ConfigError};

pub mod database;
pub mod node;

pub use database::{DatabaseOptions, MigrationMode, StoragePlatform};
pub use node::NodeOptions;

/// Top-level configuration document.
///
/// The `database` section is optional: a client that only talks to the node
/// and never records transactions does not need one.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub node: NodeOptions,
    #[serde(default)]
    pub database: Option<DatabaseOptions>,
}

impl AppConfig {
    pub fn new(node: NodeOptions) -> Self {
        Self {
            node,
            database: None,
        }
    }

    pub fn with_database(mut self, database: DatabaseOptions) -> Self {
        self.database = Some(database);
        self
    }

    /// Load configuration from a JSON document on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: AppConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.node.validate().map_err(ClientError::from)?;

        Ok(config)
    }

    /// Load configuration from the environment, honoring a `.env` file.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let node = NodeOptions::from_env()?;
        node.validate().map_err(ClientError::from)?;

        // The store is wired only when a connection URL is present.
        let database = match DatabaseOptions::from_env() {
            Ok(options) => Some(options),
            Err(ConfigError::MissingEnvVar(_)) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self { node, database })
    }

    /// The database section, or a [`ConfigError::MissingSection`] naming it.
    pub fn require_database(&self) -> Result<&DatabaseOptions, ClientError> {
        self.database
            .as_ref()
            .ok_or_else(|| ConfigError::MissingSection("database".to_string()).into())
    }
}

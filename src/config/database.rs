//! Transaction store options: connection, platform, and migration policy.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

/// Environment variable names understood by [`DatabaseOptions::from_env`].
pub mod env_keys {
    pub const URL: &str = "DATABASE_URL";
    pub const PLATFORM: &str = "DATABASE_PLATFORM";
    pub const MIGRATION: &str = "DATABASE_MIGRATION";
}

/// Storage backend for the transaction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoragePlatform {
    #[default]
    Postgres,
    Sqlite,
}

impl StoragePlatform {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StoragePlatform::Postgres => "postgres",
            StoragePlatform::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StoragePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoragePlatform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoragePlatform::Postgres),
            "sqlite" => Ok(StoragePlatform::Sqlite),
            other => Err(ConfigError::InvalidValue {
                key: env_keys::PLATFORM.to_string(),
                message: format!("unknown storage platform '{}'", other),
            }),
        }
    }
}

/// Schema evolution policy applied when the store is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MigrationMode {
    /// Leave the schema alone; the operator applies migrations out of band.
    #[default]
    None,
    /// Apply pending migrations before the store is handed out.
    Automatic,
}

impl MigrationMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationMode::None => "none",
            MigrationMode::Automatic => "automatic",
        }
    }
}

impl fmt::Display for MigrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(MigrationMode::None),
            "automatic" | "auto" => Ok(MigrationMode::Automatic),
            other => Err(ConfigError::InvalidValue {
                key: env_keys::MIGRATION.to_string(),
                message: format!("unknown migration mode '{}'", other),
            }),
        }
    }
}

/// Options for the transaction store connection.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseOptions {
    pub connection_url: String,
    #[serde(default)]
    pub platform: StoragePlatform,
    #[serde(default)]
    pub migration: MigrationMode,
}

impl DatabaseOptions {
    pub fn new(connection_url: impl Into<String>) -> Self {
        Self {
            connection_url: connection_url.into(),
            platform: StoragePlatform::default(),
            migration: MigrationMode::default(),
        }
    }

    pub fn with_platform(mut self, platform: StoragePlatform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_migration(mut self, migration: MigrationMode) -> Self {
        self.migration = migration;
        self
    }

    /// Build options from `DATABASE_*` environment variables.
    /// `DATABASE_URL` is required; platform and migration mode fall back to
    /// their defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let connection_url = match env::var(env_keys::URL) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => return Err(ConfigError::MissingEnvVar(env_keys::URL.to_string())),
        };

        let platform = match env::var(env_keys::PLATFORM) {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => StoragePlatform::default(),
        };

        let migration = match env::var(env_keys::MIGRATION) {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => MigrationMode::default(),
        };

        Ok(Self {
            connection_url,
            platform,
            migration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [env_keys::URL, env_keys::PLATFORM, env_keys::MIGRATION] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    fn test_defaults() {
        let options = DatabaseOptions::new("postgres://localhost/ledger");

        assert_eq!(options.platform, StoragePlatform::Postgres);
        assert_eq!(options.migration, MigrationMode::None);
    }

    #[test]
    fn test_builder() {
        let options = DatabaseOptions::new("postgres://localhost/ledger")
            .with_migration(MigrationMode::Automatic)
            .with_platform(StoragePlatform::Sqlite);

        assert_eq!(options.migration, MigrationMode::Automatic);
        assert_eq!(options.platform, StoragePlatform::Sqlite);
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!(
            "postgres".parse::<StoragePlatform>().unwrap(),
            StoragePlatform::Postgres
        );
        assert_eq!(
            "PostgreSQL".parse::<StoragePlatform>().unwrap(),
            StoragePlatform::Postgres
        );
        assert_eq!(
            "sqlite".parse::<StoragePlatform>().unwrap(),
            StoragePlatform::Sqlite
        );
        assert!("oracle".parse::<StoragePlatform>().is_err());
    }

    #[test]
    fn test_migration_mode_parsing() {
        assert_eq!(
            "none".parse::<MigrationMode>().unwrap(),
            MigrationMode::None
        );
        assert_eq!(
            "Automatic".parse::<MigrationMode>().unwrap(),
            MigrationMode::Automatic
        );
        assert_eq!(
            "auto".parse::<MigrationMode>().unwrap(),
            MigrationMode::Automatic
        );
        assert!("yolo".parse::<MigrationMode>().is_err());
    }

    #[test]
    fn test_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(env_keys::URL, "postgres://ledger:pw@db/ledger");
            env::set_var(env_keys::MIGRATION, "automatic");
        }

        let options = DatabaseOptions::from_env().unwrap();
        assert_eq!(options.connection_url, "postgres://ledger:pw@db/ledger");
        assert_eq!(options.platform, StoragePlatform::Postgres);
        assert_eq!(options.migration, MigrationMode::Automatic);

        clear_env();
    }

    #[test]
    fn test_from_env_requires_url() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        let err = DatabaseOptions::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == env_keys::URL));
    }

    #[test]
    fn test_serde_round_trip() {
        let json = r#"{
            "connection_url": "postgres://localhost/ledger",
            "platform": "postgres",
            "migration": "automatic"
        }"#;

        let options: DatabaseOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.migration, MigrationMode::Automatic);
    }
}

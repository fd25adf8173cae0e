//! Node connection options and their loading sources.

use std::env;
use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;
use validator::Validate;

use crate::domain::ConfigError;

/// Environment variable names understood by [`NodeOptions::from_env`].
pub mod env_keys {
    pub const HOST: &str = "MULTICHAIN_RPC_HOST";
    pub const PORT: &str = "MULTICHAIN_RPC_PORT";
    pub const USERNAME: &str = "MULTICHAIN_RPC_USERNAME";
    pub const PASSWORD: &str = "MULTICHAIN_RPC_PASSWORD";
    pub const CHAIN_NAME: &str = "MULTICHAIN_CHAIN_NAME";
    pub const ADMIN_ADDRESS: &str = "MULTICHAIN_ADMIN_ADDRESS";
    pub const BURN_ADDRESS: &str = "MULTICHAIN_BURN_ADDRESS";
    pub const USE_SSL: &str = "MULTICHAIN_USE_SSL";
}

/// Connection and chain options for a node RPC client.
///
/// The password is held as a [`SecretString`] so it stays out of `Debug`
/// output and logs.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NodeOptions {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(length(min = 1))]
    pub username: String,
    pub password: SecretString,
    #[validate(length(min = 1))]
    pub chain_name: String,
    /// Address holding issue permission, used as the default issuance target.
    #[serde(default)]
    pub admin_address: Option<String>,
    /// Address that retired assets are sent to.
    #[serde(default)]
    pub burn_address: Option<String>,
    #[serde(default)]
    pub use_ssl: bool,
}

impl NodeOptions {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        chain_name: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: SecretString::from(password.into()),
            chain_name: chain_name.into(),
            admin_address: None,
            burn_address: None,
            use_ssl: false,
        }
    }

    pub fn with_admin_address(mut self, address: impl Into<String>) -> Self {
        self.admin_address = Some(address.into());
        self
    }

    pub fn with_burn_address(mut self, address: impl Into<String>) -> Self {
        self.burn_address = Some(address.into());
        self
    }

    pub fn with_ssl(mut self) -> Self {
        self.use_ssl = true;
        self
    }

    /// Base URL of the node's JSON-RPC endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Build options from `MULTICHAIN_*` environment variables.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] naming the offending variable when a
    /// required value is missing, empty, or fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_raw = require_env(env_keys::PORT)?;
        let port: u16 = port_raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: env_keys::PORT.to_string(),
                message: format!("'{}' is not a valid port", port_raw),
            })?;

        Ok(Self {
            host: require_env(env_keys::HOST)?,
            port,
            username: require_env(env_keys::USERNAME)?,
            password: SecretString::from(require_env(env_keys::PASSWORD)?),
            chain_name: require_env(env_keys::CHAIN_NAME)?,
            admin_address: optional_env(env_keys::ADMIN_ADDRESS),
            burn_address: optional_env(env_keys::BURN_ADDRESS),
            use_ssl: optional_env(env_keys::USE_SSL)
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
        })
    }

    /// Build options from a secrets directory holding one file per key
    /// (the layout Docker and Kubernetes mount secrets with).
    ///
    /// Required files: `rpc_host`, `rpc_port`, `rpc_username`, `rpc_password`,
    /// `chain_name`. Optional: `admin_address`, `burn_address`, `use_ssl`.
    pub fn from_secrets_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();

        let port_raw = require_secret(dir, "rpc_port")?;
        let port: u16 = port_raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "rpc_port".to_string(),
            message: format!("'{}' is not a valid port", port_raw),
        })?;

        Ok(Self {
            host: require_secret(dir, "rpc_host")?,
            port,
            username: require_secret(dir, "rpc_username")?,
            password: SecretString::from(require_secret(dir, "rpc_password")?),
            chain_name: require_secret(dir, "chain_name")?,
            admin_address: optional_secret(dir, "admin_address"),
            burn_address: optional_secret(dir, "burn_address"),
            use_ssl: optional_secret(dir, "use_ssl")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn read_secret(dir: &Path, name: &str) -> Option<String> {
    std::fs::read_to_string(dir.join(name))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_secret(dir: &Path, name: &str) -> Result<String, ConfigError> {
    read_secret(dir, name).ok_or_else(|| ConfigError::MissingSecret(name.to_string()))
}

fn optional_secret(dir: &Path, name: &str) -> Option<String> {
    read_secret(dir, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::sync::Mutex;

    // Env-mutating tests must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            env_keys::HOST,
            env_keys::PORT,
            env_keys::USERNAME,
            env_keys::PASSWORD,
            env_keys::CHAIN_NAME,
            env_keys::ADMIN_ADDRESS,
            env_keys::BURN_ADDRESS,
            env_keys::USE_SSL,
        ] {
            unsafe { env::remove_var(key) };
        }
    }

    fn set_required_env() {
        unsafe {
            env::set_var(env_keys::HOST, "10.0.0.5");
            env::set_var(env_keys::PORT, "7208");
            env::set_var(env_keys::USERNAME, "multichainrpc");
            env::set_var(env_keys::PASSWORD, "hunter2");
            env::set_var(env_keys::CHAIN_NAME, "currencies");
        }
    }

    #[test]
    fn test_explicit_options() {
        let options = NodeOptions::new("localhost", 7208, "rpcuser", "s3cret", "main")
            .with_admin_address("1AdminAddr")
            .with_burn_address("1BurnAddr");

        assert!(options.validate().is_ok());
        assert_eq!(options.endpoint(), "http://localhost:7208");
        assert_eq!(options.admin_address.as_deref(), Some("1AdminAddr"));
        assert_eq!(options.burn_address.as_deref(), Some("1BurnAddr"));
        assert_eq!(options.password.expose_secret(), "s3cret");
    }

    #[test]
    fn test_endpoint_uses_https_when_ssl_enabled() {
        let options = NodeOptions::new("node.internal", 443, "u", "p", "main").with_ssl();
        assert_eq!(options.endpoint(), "https://node.internal:443");
    }

    #[test]
    fn test_validation_rejects_empty_fields() {
        let options = NodeOptions::new("", 7208, "u", "p", "main");
        assert!(options.validate().is_err());

        let options = NodeOptions::new("host", 0, "u", "p", "main");
        assert!(options.validate().is_err());

        let options = NodeOptions::new("host", 7208, "u", "p", "");
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_password_is_redacted_in_debug_output() {
        let options = NodeOptions::new("localhost", 7208, "rpcuser", "s3cret", "main");
        let debug = format!("{:?}", options);

        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_from_env_success() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        set_required_env();
        unsafe { env::set_var(env_keys::USE_SSL, "true") };

        let options = NodeOptions::from_env().unwrap();

        assert_eq!(options.host, "10.0.0.5");
        assert_eq!(options.port, 7208);
        assert_eq!(options.username, "multichainrpc");
        assert_eq!(options.chain_name, "currencies");
        assert!(options.use_ssl);
        assert!(options.admin_address.is_none());

        clear_env();
    }

    #[test]
    fn test_from_env_names_missing_variable() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        set_required_env();
        unsafe { env::remove_var(env_keys::PASSWORD) };

        let err = NodeOptions::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnvVar(key) if key == env_keys::PASSWORD
        ));

        clear_env();
    }

    #[test]
    fn test_from_env_rejects_malformed_port() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        set_required_env();
        unsafe { env::set_var(env_keys::PORT, "not-a-port") };

        let err = NodeOptions::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key, .. } if key == env_keys::PORT
        ));

        clear_env();
    }

    #[test]
    fn test_from_env_treats_empty_as_missing() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        set_required_env();
        unsafe { env::set_var(env_keys::HOST, "   ") };

        let err = NodeOptions::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));

        clear_env();
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes\n"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("banana"));
    }
}

use crate::core::rules::RuleTable;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Settings for the ingest service, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub delivery: DeliveryConfig,
    pub pipeline: PipelineConfig,
    pub rules: RuleTable,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub auth_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            auth_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8081/users".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// JSON log file written next to console output.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl ServiceConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        use std::net::ToSocketAddrs;
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| EtlError::InvalidConfigValueError {
                field: "server.host".to_string(),
                value: self.server.host.clone(),
                reason: "Host does not resolve to an address".to_string(),
            })
    }

    pub fn auth_key(&self) -> Result<&str> {
        validate_required_field("server.auth_key", &self.server.auth_key).map(String::as_str)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.port", self.server.port as usize, 1)?;

        let key = self.auth_key()?;
        validate_non_empty_string("server.auth_key", key)?;
        if key.starts_with("${") {
            return Err(EtlError::InvalidConfigValueError {
                field: "server.auth_key".to_string(),
                value: key.to_string(),
                reason: "Environment variable is not set".to_string(),
            });
        }

        validate_url("delivery.endpoint", &self.delivery.endpoint)?;
        validate_positive_number("delivery.timeout_seconds", self.delivery.timeout_seconds as usize, 1)?;

        if let Some(workers) = self.pipeline.workers {
            validate_positive_number("pipeline.workers", workers, 1)?;
        }

        validate_range(
            "rules.max_age",
            self.rules.max_age,
            self.rules.min_age_exclusive.saturating_add(1),
            i64::MAX,
        )?;
        validate_range(
            "rules.middle_to",
            self.rules.middle_to,
            self.rules.middle_from,
            i64::MAX,
        )?;

        if let Some(file) = &self.logging.file {
            validate_path("logging.file", file)?;
        }
        Ok(())
    }
}

impl ConfigProvider for ServiceConfig {
    fn delivery_endpoint(&self) -> &str {
        &self.delivery.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery.timeout_seconds)
    }

    fn workers(&self) -> Option<usize> {
        self.pipeline.workers
    }
}

pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_path, validate_positive_number, validate_url, Validate,
};
use std::time::Duration;

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "users-etl"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Convert an XML user batch to JSON and send it to a collector")
)]
pub struct CliConfig {
    /// XML file with a <users> document
    #[cfg_attr(feature = "cli", arg(long))]
    pub input: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "http://localhost:8081/users"))]
    pub endpoint: String,

    /// Directory for --dry-run output
    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    /// Upper bound on converter threads (defaults to available parallelism)
    #[cfg_attr(feature = "cli", arg(long))]
    pub workers: Option<usize>,

    #[cfg_attr(feature = "cli", arg(long, default_value = "10"))]
    pub timeout_secs: u64,

    /// Write users.json to --output-path instead of posting it
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn delivery_endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn workers(&self) -> Option<usize> {
        self.workers
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_file_extensions("input", std::slice::from_ref(&self.input), &["xml"])?;
        if self.dry_run {
            validate_path("output_path", &self.output_path)?;
        } else {
            validate_url("endpoint", &self.endpoint)?;
        }
        if let Some(workers) = self.workers {
            validate_positive_number("workers", workers, 1)?;
        }
        validate_positive_number("timeout_secs", self.timeout_secs as usize, 1)?;
        Ok(())
    }
}

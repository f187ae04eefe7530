pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

pub use adapters::{
    http::HttpDelivery,
    storage::{FileDelivery, LocalStorage},
    xml::parse_users,
};
pub use config::{toml_config::ServiceConfig, CliConfig};
pub use core::{
    aggregate::{FailureReason, ValidationErrors, ValidationFailure},
    converter::Converter,
    etl::{EtlEngine, RunOutcome, RunReport},
    pipeline::UsersPipeline,
    rules::RuleTable,
};
pub use domain::model::{AgeGroup, BatchResult, OutputUser, RawUser};
pub use utils::error::{EtlError, Result};

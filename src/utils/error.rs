use crate::core::aggregate::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Input payload is empty")]
    EmptyData,

    #[error("No user records in payload")]
    NoRecords,

    #[error("Expected <users> root element, found <{found}>")]
    UnexpectedRoot { found: String },

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Payload is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("All {count} records failed validation: {0}", count = .0.len())]
    AllRecordsInvalid(ValidationErrors),

    #[error("Collector rejected delivery with status {status}: {body}")]
    DeliveryStatus { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Worker pool error: {message}")]
    WorkerPool { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Validation,
    Delivery,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::EmptyData
            | EtlError::NoRecords
            | EtlError::UnexpectedRoot { .. }
            | EtlError::Xml(_)
            | EtlError::Encoding(_) => ErrorCategory::Input,
            EtlError::AllRecordsInvalid(_) => ErrorCategory::Validation,
            EtlError::DeliveryStatus { .. } | EtlError::Http(_) => ErrorCategory::Delivery,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::SerializationError(_) | EtlError::WorkerPool { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Validation => ErrorSeverity::High,
            // The collector may come back; a rerun is enough.
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::EmptyData => "Send a non-empty XML document with a <users> root",
            EtlError::NoRecords => "Add at least one <user> element to the document",
            EtlError::UnexpectedRoot { .. } => "Wrap the user elements in a <users> root",
            EtlError::Xml(_) | EtlError::Encoding(_) => {
                "Check that the payload is well-formed UTF-8 XML"
            }
            EtlError::AllRecordsInvalid(_) => {
                "Every user needs an id, name, email and an age between 1 and 110"
            }
            EtlError::DeliveryStatus { .. } => "Inspect the collector response and logs",
            EtlError::Http(_) => "Check that the collector endpoint is reachable",
            EtlError::IoError(_) => "Check file paths and permissions",
            EtlError::SerializationError(_) => "Report this as a bug",
            EtlError::WorkerPool { .. } => "Retry the batch; report if it keeps failing",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => "Fix the configuration and restart",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::AllRecordsInvalid(errors) => {
                format!("No valid users to deliver ({} rejected)", errors.len())
            }
            EtlError::DeliveryStatus { status, .. } => {
                format!("The collector refused the batch (HTTP {})", status)
            }
            EtlError::Http(_) => "Could not reach the collector".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

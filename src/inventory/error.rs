use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid YAML format: {reason}")]
    InvalidYaml { reason: String },

    #[error("Invalid JSON format: {reason}")]
    InvalidJson { reason: String },

    #[error("Unsupported inventory format: {path} (expected .yml, .yaml or .json)")]
    UnsupportedFormat { path: String },

    #[error("Inventory validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Inventory contains no hosts")]
    EmptyHostList,

    #[error("Duplicate host address: {host}")]
    DuplicateHost { host: String },

    #[error("Invalid host entry: {reason}")]
    InvalidHost { reason: String },

    #[error("Invalid release layout: {reason}")]
    InvalidLayout { reason: String },
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Error reading configuration file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid JSON file {path}: {message}")]
    InvalidJson { path: PathBuf, message: String },

    #[error("{section}: {field} is mandatory")]
    MissingField { section: String, field: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{owner} references undeclared {kind} '{name}'")]
    DanglingReference {
        owner: String,
        kind: &'static str,
        name: String,
    },

    #[error("Duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Template error: {0}")]
    TemplateRenderError(String),

    #[error("Error hashing the instance user password: {0}")]
    PasswordHash(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

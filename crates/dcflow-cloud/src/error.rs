//! Engine error types
//!
//! Provider implementations report [`ProviderError`]s. The engine turns them
//! into a single [`CloudError`] carrying a fixed message for the operation
//! that failed; nothing is re-wrapped on the way up.

use crate::remote::ResourceKind;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of a raw provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    NotFound,
    Conflict,
    Timeout,
    Other,
}

/// A failed call across the provider boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Conflict, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ProviderErrorKind::NotFound
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Error taxonomy surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Ambiguity,
    NotFound,
    Provider,
}

/// Orchestration errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error(transparent)]
    Model(#[from] dcflow_core::ModelError),

    #[error("{kind} '{name}' not found!")]
    Unresolved { kind: ResourceKind, name: String },

    #[error("Found more than one {kind} named '{name}' ({count} matches)!")]
    Ambiguous {
        kind: ResourceKind,
        name: String,
        count: usize,
    },

    #[error("{message}")]
    Provider {
        message: String,
        #[source]
        source: ProviderError,
    },

    #[error("Private key file {path}: {source}")]
    Credential {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CloudError {
    pub fn provider(message: impl Into<String>, source: ProviderError) -> Self {
        CloudError::Provider {
            message: message.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::Model(_) => ErrorKind::Configuration,
            CloudError::Unresolved { .. } => ErrorKind::NotFound,
            CloudError::Ambiguous { .. } => ErrorKind::Ambiguity,
            CloudError::Provider { .. } | CloudError::Credential { .. } => ErrorKind::Provider,
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

/// Attach the fixed operation message to a provider failure
pub trait ProviderResultExt<T> {
    fn or_fail(self, message: &str) -> Result<T>;
}

impl<T> ProviderResultExt<T> for ProviderResult<T> {
    fn or_fail(self, message: &str) -> Result<T> {
        self.map_err(|source| CloudError::provider(message, source))
    }
}

pub mod error;

pub use error::*;

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const ENV_REGION: &str = "AWS_DEFAULT_REGION";
pub const ENV_DATACENTER_DIR: &str = "DATACENTER_DIR";

/// Region and credentials every provider call is made with
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderContext {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl ProviderContext {
    /// Read the context from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the context through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnv(key))
        };

        Ok(Self {
            access_key_id: required(ENV_ACCESS_KEY_ID)?,
            secret_access_key: required(ENV_SECRET_ACCESS_KEY)?,
            region: required(ENV_REGION)?,
            session_token: lookup(ENV_SESSION_TOKEN).filter(|v| !v.trim().is_empty()),
        })
    }
}

impl fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Local directory layout: private keys and project templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatacenterDirs {
    pub root: PathBuf,
    pub access_dir: PathBuf,
    pub templates_dir: PathBuf,
}

impl DatacenterDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            access_dir: root.join("access"),
            templates_dir: root.join("project").join("templates"),
            root,
        }
    }

    /// `DATACENTER_DIR`, falling back to `<user config dir>/dcflow`
    pub fn from_env() -> Result<Self> {
        if let Ok(dir) = std::env::var(ENV_DATACENTER_DIR)
            && !dir.trim().is_empty()
        {
            let root = PathBuf::from(dir);
            if !root.is_dir() {
                return Err(ConfigError::DatacenterDirNotFound(root));
            }
            debug!(dir = %root.display(), "Using DATACENTER_DIR");
            return Ok(Self::new(root));
        }

        let root = dirs::config_dir()
            .ok_or(ConfigError::ConfigDirNotFound)?
            .join("dcflow");
        debug!(dir = %root.display(), "Using default datacenter directory");
        Ok(Self::new(root))
    }

    /// Create the access directory if missing and return it
    pub fn ensure_access_dir(&self) -> Result<&Path> {
        if !self.access_dir.exists() {
            std::fs::create_dir_all(&self.access_dir)?;
        }
        Ok(&self.access_dir)
    }

    /// Templates directory, if it exists
    pub fn existing_templates_dir(&self) -> Option<&Path> {
        self.templates_dir
            .is_dir()
            .then_some(self.templates_dir.as_path())
    }
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} not set!")]
    MissingEnv(&'static str),

    #[error("User config directory not found; set DATACENTER_DIR")]
    ConfigDirNotFound,

    #[error("Datacenter directory {0} does not exist")]
    DatacenterDirNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

//! dcflow-core
//!
//! Declarative datacenter model, configuration loading and boot payload
//! rendering.

pub mod error;
pub mod loader;
pub mod model;
pub mod template;

pub use error::{ModelError, Result};
pub use loader::{load_datacenter, load_hosted_zone, parse_datacenter, parse_hosted_zone};
pub use model::*;
pub use template::{BootParams, BootTemplate};

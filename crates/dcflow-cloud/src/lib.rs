//! dcflow Cloud Engine
//!
//! Converges a provider towards a declared datacenter: one network with its
//! gateway, route table, subnets, security groups, key pairs, instances and
//! DNS records. Every resource is identified by its `Name` tag, so repeated
//! runs find what earlier runs created and only act on the difference.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   dcflow CLI                     │
//! │     (provision / decommission / capture-images)  │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 dcflow-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │ Engine: forward / reverse passes, DNS    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │  Accessors   │  │ ensure_created /     │     │
//! │  │  (per kind)  │  │ ensure_deleted       │     │
//! │  └──────────────┘  └──────────────────────┘     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        trait Provider { ... }            │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │      aws      │ │    memory     │
//! │   provider    │ │   provider    │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! Runs are single-writer: two passes against the same target must never
//! overlap.
//!
//! The memory provider is only built for tests or with the `test-util`
//! feature.

pub mod accessors;
mod capture;
pub mod credentials;
mod decommission;
mod dns;
mod engine;
pub mod error;
pub mod identity;
pub mod lookup;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod provider;
mod provision;
pub mod remote;
pub mod report;
pub mod rules;
pub mod waiter;

// Re-exports
pub use credentials::CredentialStore;
pub use engine::Engine;
pub use error::{
    CloudError, ErrorKind, ProviderError, ProviderErrorKind, ProviderResult, ProviderResultExt,
    Result,
};
pub use lookup::{Accessor, Ensured, ensure_created, ensure_created_with, ensure_deleted};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryProvider;
pub use provider::{
    ChangeAction, Created, ImageQuery, NewInstance, NewResource, Provider, RecordChange,
};
pub use provision::ProvisionOutcome;
pub use remote::{ResourceId, ResourceKind, TerminalState};
pub use report::{InstanceInventory, Report, ReportSummary, StepOutcome, StepRecord};
pub use rules::RuleKey;
pub use waiter::{WaitConfig, poll_until};

//! Lookup-or-create primitive shared by every tagged resource kind
//!
//! Creation and deletion are both gated by a `find` on the logical name.
//! Repeated runs therefore converge: an existing resource is left alone and
//! an absent one is not deleted twice. Two runs against the same target must
//! not overlap, since nothing guards the gap between `find` and the action.

use crate::error::{CloudError, ProviderError, Result};
use crate::remote::{ResourceId, ResourceKind};
use async_trait::async_trait;
use dcflow_core::LogicalName;
use std::future::Future;
use tracing::{info, warn};

/// Access to one resource kind
#[async_trait]
pub trait Accessor: Send + Sync {
    type Remote: Send + Sync;
    type Request: Send + Sync;

    const KIND: ResourceKind;

    /// The single live resource carrying `name`, if any
    async fn find(&self, name: &LogicalName) -> Result<Option<Self::Remote>>;

    /// Create the resource tagged with `name` and wait until it is ready
    async fn create(&self, name: &LogicalName, request: &Self::Request) -> Result<ResourceId>;

    async fn delete(&self, remote: &Self::Remote) -> Result<()>;

    /// Pre-conditions that must hold before [`Accessor::delete`]
    async fn before_delete(&self, _remote: &Self::Remote) -> Result<()> {
        Ok(())
    }
}

/// Whether [`ensure_created`] made a new resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ensured<T> {
    Created(T),
    Existing(T),
}

impl<T> Ensured<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Ensured::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Ensured::Created(t) | Ensured::Existing(t) => t,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Ensured::Created(t) | Ensured::Existing(t) => t,
        }
    }
}

/// Find `name`, creating it from `request` when absent
pub async fn ensure_created<A: Accessor>(
    accessor: &A,
    name: &LogicalName,
    request: &A::Request,
) -> Result<Ensured<A::Remote>> {
    if let Some(existing) = find_existing(accessor, name).await? {
        return Ok(Ensured::Existing(existing));
    }
    create_and_resolve(accessor, name, request)
        .await
        .map(Ensured::Created)
}

/// Like [`ensure_created`], building the request only when it is needed
pub async fn ensure_created_with<A, F, Fut>(
    accessor: &A,
    name: &LogicalName,
    build: F,
) -> Result<Ensured<A::Remote>>
where
    A: Accessor,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<A::Request>>,
{
    if let Some(existing) = find_existing(accessor, name).await? {
        return Ok(Ensured::Existing(existing));
    }
    let request = build().await?;
    create_and_resolve(accessor, name, &request)
        .await
        .map(Ensured::Created)
}

/// Delete `name` if it exists; returns the deleted resource
pub async fn ensure_deleted<A: Accessor>(
    accessor: &A,
    name: &LogicalName,
) -> Result<Option<A::Remote>> {
    let Some(remote) = accessor.find(name).await? else {
        warn!(kind = %A::KIND, %name, "{} '{}' already deleted", A::KIND, name);
        return Ok(None);
    };

    accessor.before_delete(&remote).await?;
    accessor.delete(&remote).await?;
    info!(kind = %A::KIND, %name, "{} '{}' deleted", A::KIND, name);
    Ok(Some(remote))
}

async fn find_existing<A: Accessor>(accessor: &A, name: &LogicalName) -> Result<Option<A::Remote>> {
    let found = accessor.find(name).await?;
    if found.is_some() {
        warn!(kind = %A::KIND, %name, "{} '{}' already exists", A::KIND, name);
    }
    Ok(found)
}

async fn create_and_resolve<A: Accessor>(
    accessor: &A,
    name: &LogicalName,
    request: &A::Request,
) -> Result<A::Remote> {
    let id = accessor.create(name, request).await?;
    info!(kind = %A::KIND, %name, %id, "{} '{}' created", A::KIND, name);

    accessor.find(name).await?.ok_or_else(|| {
        CloudError::provider(
            format!("Error loading the {} after creation!", A::KIND),
            ProviderError::not_found(format!("{} {} is not visible", A::KIND, id)),
        )
    })
}

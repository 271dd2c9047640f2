use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::lookup::Accessor;
use crate::provider::{NewResource, Provider};
use crate::remote::{Network, ResourceId, ResourceKind, TerminalState};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct NetworkRequest {
    pub cidr: String,
    pub tags: Tags,
}

pub struct NetworkAccessor {
    provider: Arc<dyn Provider>,
}

impl NetworkAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Accessor for NetworkAccessor {
    type Remote = Network;
    type Request = NetworkRequest;

    const KIND: ResourceKind = ResourceKind::Network;

    async fn find(&self, name: &LogicalName) -> Result<Option<Network>> {
        let found = self
            .provider
            .describe_networks(name)
            .await
            .or_fail("Error loading the VPC!")?;
        resolve_unique(Self::KIND, name.as_str(), found)
    }

    async fn create(&self, name: &LogicalName, request: &NetworkRequest) -> Result<ResourceId> {
        let resource = NewResource::Network {
            cidr: request.cidr.clone(),
        };
        let created = self
            .provider
            .create(&resource, &request.tags.with_identity(name))
            .await
            .or_fail("Error creating the VPC!")?;
        self.provider
            .wait_until(Self::KIND, &created.id, TerminalState::Available)
            .await
            .or_fail("Error waiting for the VPC to become available!")?;
        Ok(created.id)
    }

    async fn delete(&self, remote: &Network) -> Result<()> {
        self.provider
            .delete(Self::KIND, &remote.id)
            .await
            .or_fail("Error deleting the VPC!")
    }
}

use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::lookup::Accessor;
use crate::provider::{NewResource, Provider};
use crate::remote::{ResourceId, ResourceKind, Subnet, TerminalState};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SubnetRequest {
    pub network_id: ResourceId,
    pub az: String,
    pub cidr: String,
    pub tags: Tags,
}

pub struct SubnetAccessor {
    provider: Arc<dyn Provider>,
}

impl SubnetAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Accessor for SubnetAccessor {
    type Remote = Subnet;
    type Request = SubnetRequest;

    const KIND: ResourceKind = ResourceKind::Subnet;

    async fn find(&self, name: &LogicalName) -> Result<Option<Subnet>> {
        let found = self
            .provider
            .describe_subnets(name)
            .await
            .or_fail("Error loading the subnet!")?;
        resolve_unique(Self::KIND, name.as_str(), found)
    }

    async fn create(&self, name: &LogicalName, request: &SubnetRequest) -> Result<ResourceId> {
        let resource = NewResource::Subnet {
            network_id: request.network_id.clone(),
            az: request.az.clone(),
            cidr: request.cidr.clone(),
        };
        let created = self
            .provider
            .create(&resource, &request.tags.with_identity(name))
            .await
            .or_fail("Error creating the subnet!")?;
        self.provider
            .wait_until(Self::KIND, &created.id, TerminalState::Available)
            .await
            .or_fail("Error waiting for the subnet to become available!")?;
        Ok(created.id)
    }

    async fn delete(&self, remote: &Subnet) -> Result<()> {
        self.provider
            .delete(Self::KIND, &remote.id)
            .await
            .or_fail("Error deleting the subnet!")
    }
}

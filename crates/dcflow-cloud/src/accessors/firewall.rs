use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::lookup::Accessor;
use crate::provider::{NewResource, Provider};
use crate::remote::{FirewallGroup, ResourceId, ResourceKind, TerminalState};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FirewallGroupRequest {
    pub network_id: ResourceId,
    pub description: String,
    pub tags: Tags,
}

/// Security groups; their rules go through [`crate::rules::RuleAccessor`]
pub struct FirewallGroupAccessor {
    provider: Arc<dyn Provider>,
}

impl FirewallGroupAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Accessor for FirewallGroupAccessor {
    type Remote = FirewallGroup;
    type Request = FirewallGroupRequest;

    const KIND: ResourceKind = ResourceKind::FirewallGroup;

    async fn find(&self, name: &LogicalName) -> Result<Option<FirewallGroup>> {
        let found = self
            .provider
            .describe_firewall_groups(name)
            .await
            .or_fail("Error loading the security group!")?;
        resolve_unique(Self::KIND, name.as_str(), found)
    }

    async fn create(
        &self,
        name: &LogicalName,
        request: &FirewallGroupRequest,
    ) -> Result<ResourceId> {
        let resource = NewResource::FirewallGroup {
            network_id: request.network_id.clone(),
            group_name: name.to_string(),
            description: request.description.clone(),
        };
        let created = self
            .provider
            .create(&resource, &request.tags.with_identity(name))
            .await
            .or_fail("Error creating the security group!")?;
        self.provider
            .wait_until(Self::KIND, &created.id, TerminalState::Available)
            .await
            .or_fail("Error waiting for the security group to become available!")?;
        Ok(created.id)
    }

    async fn delete(&self, remote: &FirewallGroup) -> Result<()> {
        self.provider
            .delete(Self::KIND, &remote.id)
            .await
            .or_fail("Error deleting the security group!")
    }
}

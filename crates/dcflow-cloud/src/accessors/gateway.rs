use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::lookup::Accessor;
use crate::provider::{NewResource, Provider};
use crate::remote::{Gateway, ResourceId, ResourceKind, TerminalState};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct GatewayRequest {
    pub tags: Tags,
}

pub struct GatewayAccessor {
    provider: Arc<dyn Provider>,
}

impl GatewayAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub fn is_attached_to(&self, gateway: &Gateway, network_id: &ResourceId) -> bool {
        gateway.is_attached_to(network_id)
    }

    pub async fn attach(&self, gateway_id: &ResourceId, network_id: &ResourceId) -> Result<()> {
        self.provider
            .attach_gateway(gateway_id, network_id)
            .await
            .or_fail("Error attaching the internet gateway!")?;
        info!(gateway = %gateway_id, network = %network_id, "Internet gateway attached");
        Ok(())
    }

    pub async fn detach(&self, gateway_id: &ResourceId, network_id: &ResourceId) -> Result<()> {
        self.provider
            .detach_gateway(gateway_id, network_id)
            .await
            .or_fail("Error detaching the internet gateway!")?;
        info!(gateway = %gateway_id, network = %network_id, "Internet gateway detached");
        Ok(())
    }
}

#[async_trait]
impl Accessor for GatewayAccessor {
    type Remote = Gateway;
    type Request = GatewayRequest;

    const KIND: ResourceKind = ResourceKind::Gateway;

    async fn find(&self, name: &LogicalName) -> Result<Option<Gateway>> {
        let found = self
            .provider
            .describe_gateways(name)
            .await
            .or_fail("Error loading the internet gateway!")?;
        resolve_unique(Self::KIND, name.as_str(), found)
    }

    async fn create(&self, name: &LogicalName, request: &GatewayRequest) -> Result<ResourceId> {
        let created = self
            .provider
            .create(&NewResource::Gateway, &request.tags.with_identity(name))
            .await
            .or_fail("Error creating the internet gateway!")?;
        self.provider
            .wait_until(Self::KIND, &created.id, TerminalState::Available)
            .await
            .or_fail("Error waiting for the internet gateway to become available!")?;
        Ok(created.id)
    }

    /// A gateway still attached to a network cannot be deleted
    async fn before_delete(&self, remote: &Gateway) -> Result<()> {
        for network_id in &remote.attached_network_ids {
            self.detach(&remote.id, network_id).await?;
        }
        Ok(())
    }

    async fn delete(&self, remote: &Gateway) -> Result<()> {
        self.provider
            .delete(Self::KIND, &remote.id)
            .await
            .or_fail("Error deleting the internet gateway!")
    }
}

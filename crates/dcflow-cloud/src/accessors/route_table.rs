use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::lookup::Accessor;
use crate::provider::{NewResource, Provider};
use crate::remote::{ResourceId, ResourceKind, RouteTable, TerminalState};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};
use std::sync::Arc;
use tracing::info;

/// Destination of the route to the internet gateway
pub const DEFAULT_ROUTE_CIDR: &str = "0.0.0.0/0";

#[derive(Debug, Clone)]
pub struct RouteTableRequest {
    pub network_id: ResourceId,
    pub tags: Tags,
}

pub struct RouteTableAccessor {
    provider: Arc<dyn Provider>,
}

impl RouteTableAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub fn has_route(
        &self,
        table: &RouteTable,
        gateway_id: &ResourceId,
        destination_cidr: &str,
    ) -> bool {
        table.has_route(gateway_id, destination_cidr)
    }

    pub fn has_association(&self, table: &RouteTable, subnet_id: &ResourceId) -> bool {
        table.is_associated_with(subnet_id)
    }

    pub async fn associate(&self, table_id: &ResourceId, subnet_id: &ResourceId) -> Result<()> {
        self.provider
            .associate_route_table(table_id, subnet_id)
            .await
            .or_fail("Error associating the route table!")?;
        info!(table = %table_id, subnet = %subnet_id, "Route table associated");
        Ok(())
    }

    pub async fn create_route(
        &self,
        table_id: &ResourceId,
        gateway_id: &ResourceId,
        destination_cidr: &str,
    ) -> Result<()> {
        self.provider
            .create_route(table_id, gateway_id, destination_cidr)
            .await
            .or_fail("Error creating the route!")?;
        info!(table = %table_id, gateway = %gateway_id, destination_cidr, "Route created");
        Ok(())
    }
}

#[async_trait]
impl Accessor for RouteTableAccessor {
    type Remote = RouteTable;
    type Request = RouteTableRequest;

    const KIND: ResourceKind = ResourceKind::RouteTable;

    async fn find(&self, name: &LogicalName) -> Result<Option<RouteTable>> {
        let found = self
            .provider
            .describe_route_tables(name)
            .await
            .or_fail("Error loading the route table!")?;
        resolve_unique(Self::KIND, name.as_str(), found)
    }

    async fn create(&self, name: &LogicalName, request: &RouteTableRequest) -> Result<ResourceId> {
        let resource = NewResource::RouteTable {
            network_id: request.network_id.clone(),
        };
        let created = self
            .provider
            .create(&resource, &request.tags.with_identity(name))
            .await
            .or_fail("Error creating the route table!")?;
        self.provider
            .wait_until(Self::KIND, &created.id, TerminalState::Available)
            .await
            .or_fail("Error waiting for the route table to become available!")?;
        Ok(created.id)
    }

    async fn delete(&self, remote: &RouteTable) -> Result<()> {
        self.provider
            .delete(Self::KIND, &remote.id)
            .await
            .or_fail("Error deleting the route table!")
    }
}

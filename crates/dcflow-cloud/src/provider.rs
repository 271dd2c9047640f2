//! Provider boundary
//!
//! Everything the engine needs from the remote control plane. Describe calls
//! filter on the `Name` tag and return every match; choosing among them is
//! the engine's job.

use crate::error::ProviderResult;
use crate::remote::{
    DnsRecord, FirewallGroup, Gateway, HostedZone, Image, IngressRule, Instance, KeyPair, Network,
    ResourceId, ResourceKind, RouteTable, Subnet, TerminalState,
};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};

/// Attributes of a resource to create, by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewResource {
    Network {
        cidr: String,
    },
    Subnet {
        network_id: ResourceId,
        az: String,
        cidr: String,
    },
    Gateway,
    RouteTable {
        network_id: ResourceId,
    },
    FirewallGroup {
        network_id: ResourceId,
        group_name: String,
        description: String,
    },
    Instance(NewInstance),
    Image {
        instance_id: ResourceId,
        image_name: String,
        description: Option<String>,
    },
    KeyPair {
        key_name: String,
    },
}

impl NewResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            NewResource::Network { .. } => ResourceKind::Network,
            NewResource::Subnet { .. } => ResourceKind::Subnet,
            NewResource::Gateway => ResourceKind::Gateway,
            NewResource::RouteTable { .. } => ResourceKind::RouteTable,
            NewResource::FirewallGroup { .. } => ResourceKind::FirewallGroup,
            NewResource::Instance(_) => ResourceKind::Instance,
            NewResource::Image { .. } => ResourceKind::Image,
            NewResource::KeyPair { .. } => ResourceKind::KeyPair,
        }
    }
}

/// Launch parameters of a compute instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstance {
    pub image_id: ResourceId,
    pub instance_type: String,
    pub subnet_id: ResourceId,
    pub private_ip: String,
    pub firewall_group_ids: Vec<ResourceId>,
    pub key_name: String,
    /// Base64 encoded boot payload
    pub user_data: String,
    pub volume_size: i32,
    pub device: String,
    pub tenancy: String,
}

/// Outcome of a create call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: ResourceId,
    /// Secret material the provider returns once (key pair private key)
    pub secret: Option<String>,
}

impl Created {
    pub fn new(id: impl Into<ResourceId>) -> Self {
        Self {
            id: id.into(),
            secret: None,
        }
    }
}

/// How images are looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageQuery {
    /// By `Name` tag, for images this engine captures
    Tagged(LogicalName),
    /// By provider image name, for parent images built elsewhere
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Create,
    Delete,
}

/// A DNS record set change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub action: ChangeAction,
    pub record: DnsRecord,
}

/// Remote control plane the engine drives
///
/// Relationship calls (attach, associate, routes, rules) are not idempotent;
/// callers check the current state first.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider name (e.g., "aws")
    fn name(&self) -> &str;

    async fn describe_networks(&self, name: &LogicalName) -> ProviderResult<Vec<Network>>;
    async fn describe_subnets(&self, name: &LogicalName) -> ProviderResult<Vec<Subnet>>;
    async fn describe_gateways(&self, name: &LogicalName) -> ProviderResult<Vec<Gateway>>;
    async fn describe_route_tables(&self, name: &LogicalName) -> ProviderResult<Vec<RouteTable>>;
    async fn describe_firewall_groups(
        &self,
        name: &LogicalName,
    ) -> ProviderResult<Vec<FirewallGroup>>;
    /// All instances carrying the name, whatever their state
    async fn describe_instances(&self, name: &LogicalName) -> ProviderResult<Vec<Instance>>;
    async fn describe_images(&self, query: &ImageQuery) -> ProviderResult<Vec<Image>>;
    async fn describe_key_pairs(&self, name: &LogicalName) -> ProviderResult<Vec<KeyPair>>;
    async fn describe_ingress_rules(&self, group_id: &ResourceId)
    -> ProviderResult<Vec<IngressRule>>;

    async fn list_hosted_zones(&self) -> ProviderResult<Vec<HostedZone>>;
    async fn list_records(&self, zone_id: &ResourceId) -> ProviderResult<Vec<DnsRecord>>;

    /// Create a resource tagged with `tags`
    async fn create(&self, resource: &NewResource, tags: &Tags) -> ProviderResult<Created>;
    async fn delete(&self, kind: ResourceKind, id: &ResourceId) -> ProviderResult<()>;
    /// Block until the resource reaches `state`, bounded by the provider's wait
    async fn wait_until(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        state: TerminalState,
    ) -> ProviderResult<()>;

    async fn attach_gateway(
        &self,
        gateway_id: &ResourceId,
        network_id: &ResourceId,
    ) -> ProviderResult<()>;
    async fn detach_gateway(
        &self,
        gateway_id: &ResourceId,
        network_id: &ResourceId,
    ) -> ProviderResult<()>;
    async fn associate_route_table(
        &self,
        table_id: &ResourceId,
        subnet_id: &ResourceId,
    ) -> ProviderResult<()>;
    async fn create_route(
        &self,
        table_id: &ResourceId,
        gateway_id: &ResourceId,
        destination_cidr: &str,
    ) -> ProviderResult<()>;
    async fn authorize_ingress(&self, group_id: &ResourceId, rule: &IngressRule)
    -> ProviderResult<()>;
    async fn revoke_ingress(&self, group_id: &ResourceId, rule: &IngressRule) -> ProviderResult<()>;

    /// Submit a record change; returns the change id to wait on
    async fn change_record(
        &self,
        zone_id: &ResourceId,
        change: &RecordChange,
    ) -> ProviderResult<ResourceId>;
}

//! AWS provider implementation

use crate::ec2::Ec2;
use crate::route53::Route53;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::config::Credentials;
use dcflow_cloud::remote::{
    DnsRecord, FirewallGroup, Gateway, HostedZone, Image, IngressRule, Instance, InstanceState,
    KeyPair, Network, RouteTable, Subnet,
};
use dcflow_cloud::{
    Created, ImageQuery, NewResource, Provider, ProviderError, ProviderResult, RecordChange,
    ResourceId, ResourceKind, TerminalState, WaitConfig, poll_until,
};
use dcflow_config::ProviderContext;
use dcflow_core::{LogicalName, Tags};
use tracing::{debug, info};

/// Source name reported for statically supplied credentials
const CREDENTIALS_SOURCE: &str = "dcflow";

/// AWS provider backed by EC2 and Route 53
pub struct AwsProvider {
    ec2: Ec2,
    route53: Route53,
    region: String,
    wait: WaitConfig,
}

impl AwsProvider {
    /// Build SDK clients for the context's region and credentials
    pub async fn from_context(context: &ProviderContext) -> Self {
        let credentials = Credentials::new(
            &context.access_key_id,
            &context.secret_access_key,
            context.session_token.clone(),
            None,
            CREDENTIALS_SOURCE,
        );
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(context.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        info!(region = %context.region, "AWS provider initialized");
        Self {
            ec2: Ec2::new(aws_sdk_ec2::Client::new(&config)),
            route53: Route53::new(aws_sdk_route53::Client::new(&config)),
            region: context.region.clone(),
            wait: WaitConfig::default(),
        }
    }

    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    async fn exists(&self, kind: ResourceKind, id: &ResourceId) -> ProviderResult<bool> {
        match kind {
            ResourceKind::Network => self.ec2.network_available(id).await,
            ResourceKind::Subnet => self.ec2.subnet_available(id).await,
            ResourceKind::Gateway => self.ec2.gateway_exists(id).await,
            ResourceKind::RouteTable => self.ec2.route_table_exists(id).await,
            ResourceKind::FirewallGroup => self.ec2.firewall_group_exists(id).await,
            ResourceKind::KeyPair => self.ec2.key_pair_exists(id).await,
            ResourceKind::Image => Ok(self.ec2.image(id).await?.is_some()),
            ResourceKind::Instance => Ok(self
                .ec2
                .instance_state(id)
                .await?
                .is_some_and(|s| s.is_live())),
            other => Err(unsupported(other, "wait on")),
        }
    }

    async fn reached(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        state: TerminalState,
    ) -> ProviderResult<bool> {
        match (kind, state) {
            (ResourceKind::Instance, TerminalState::Running) => {
                Ok(self.ec2.instance_state(id).await? == Some(InstanceState::Running))
            }
            (ResourceKind::Instance, TerminalState::Terminated) => {
                match self.ec2.instance_state(id).await {
                    Ok(state) => Ok(matches!(state, None | Some(InstanceState::Terminated))),
                    Err(e) if e.is_not_found() => Ok(true),
                    Err(e) => Err(e),
                }
            }
            (ResourceKind::Image, TerminalState::Available) => match self.ec2.image(id).await? {
                Some(image) if image.state == "failed" => {
                    Err(ProviderError::other(format!("Image {} failed", id)))
                }
                Some(image) => Ok(image.state == "available"),
                None => Ok(false),
            },
            (ResourceKind::DnsRecord, TerminalState::InSync) => {
                self.route53.change_in_sync(id).await
            }
            (_, TerminalState::Deleted) => match self.exists(kind, id).await {
                Ok(exists) => Ok(!exists),
                Err(e) if e.is_not_found() => Ok(true),
                Err(e) => Err(e),
            },
            (_, TerminalState::Available) => self.exists(kind, id).await,
            (kind, state) => Err(ProviderError::other(format!(
                "Cannot wait for {} to become {}",
                kind, state
            ))),
        }
    }
}

fn unsupported(kind: ResourceKind, action: &str) -> ProviderError {
    ProviderError::other(format!("Cannot {} a {} through EC2", action, kind))
}

#[async_trait]
impl Provider for AwsProvider {
    fn name(&self) -> &str {
        "aws"
    }

    async fn describe_networks(&self, name: &LogicalName) -> ProviderResult<Vec<Network>> {
        self.ec2.describe_networks(name).await
    }

    async fn describe_subnets(&self, name: &LogicalName) -> ProviderResult<Vec<Subnet>> {
        self.ec2.describe_subnets(name).await
    }

    async fn describe_gateways(&self, name: &LogicalName) -> ProviderResult<Vec<Gateway>> {
        self.ec2.describe_gateways(name).await
    }

    async fn describe_route_tables(&self, name: &LogicalName) -> ProviderResult<Vec<RouteTable>> {
        self.ec2.describe_route_tables(name).await
    }

    async fn describe_firewall_groups(
        &self,
        name: &LogicalName,
    ) -> ProviderResult<Vec<FirewallGroup>> {
        self.ec2.describe_firewall_groups(name).await
    }

    async fn describe_instances(&self, name: &LogicalName) -> ProviderResult<Vec<Instance>> {
        self.ec2.describe_instances(name).await
    }

    async fn describe_images(&self, query: &ImageQuery) -> ProviderResult<Vec<Image>> {
        match query {
            ImageQuery::Tagged(name) => self.ec2.describe_images_tagged(name).await,
            ImageQuery::Named(image_name) => self.ec2.describe_images_named(image_name).await,
        }
    }

    async fn describe_key_pairs(&self, name: &LogicalName) -> ProviderResult<Vec<KeyPair>> {
        self.ec2.describe_key_pairs(name).await
    }

    async fn describe_ingress_rules(
        &self,
        group_id: &ResourceId,
    ) -> ProviderResult<Vec<IngressRule>> {
        self.ec2.describe_ingress_rules(group_id).await
    }

    async fn list_hosted_zones(&self) -> ProviderResult<Vec<HostedZone>> {
        self.route53.list_hosted_zones().await
    }

    async fn list_records(&self, zone_id: &ResourceId) -> ProviderResult<Vec<DnsRecord>> {
        self.route53.list_records(zone_id).await
    }

    async fn create(&self, resource: &NewResource, tags: &Tags) -> ProviderResult<Created> {
        debug!(kind = %resource.kind(), "Creating resource");
        match resource {
            NewResource::Network { cidr } => self.ec2.create_network(cidr, tags).await,
            NewResource::Subnet {
                network_id,
                az,
                cidr,
            } => self.ec2.create_subnet(network_id, az, cidr, tags).await,
            NewResource::Gateway => self.ec2.create_gateway(tags).await,
            NewResource::RouteTable { network_id } => {
                self.ec2.create_route_table(network_id, tags).await
            }
            NewResource::FirewallGroup {
                network_id,
                group_name,
                description,
            } => {
                self.ec2
                    .create_firewall_group(network_id, group_name, description, tags)
                    .await
            }
            NewResource::Instance(launch) => self.ec2.run_instance(launch, tags).await,
            NewResource::Image {
                instance_id,
                image_name,
                description,
            } => {
                self.ec2
                    .create_image(instance_id, image_name, description.as_deref(), tags)
                    .await
            }
            NewResource::KeyPair { key_name } => self.ec2.create_key_pair(key_name, tags).await,
        }
    }

    async fn delete(&self, kind: ResourceKind, id: &ResourceId) -> ProviderResult<()> {
        debug!(%kind, %id, "Deleting resource");
        match kind {
            ResourceKind::Network => self.ec2.delete_network(id).await,
            ResourceKind::Subnet => self.ec2.delete_subnet(id).await,
            ResourceKind::Gateway => self.ec2.delete_gateway(id).await,
            ResourceKind::RouteTable => self.ec2.delete_route_table(id).await,
            ResourceKind::FirewallGroup => self.ec2.delete_firewall_group(id).await,
            ResourceKind::Instance => self.ec2.terminate_instance(id).await,
            ResourceKind::Image => self.ec2.delete_image(id).await,
            ResourceKind::KeyPair => self.ec2.delete_key_pair(id).await,
            other => Err(unsupported(other, "delete")),
        }
    }

    async fn wait_until(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        state: TerminalState,
    ) -> ProviderResult<()> {
        let what = format!("{} {} {}", kind, id, state);
        poll_until(&what, &self.wait, || self.reached(kind, id, state)).await
    }

    async fn attach_gateway(
        &self,
        gateway_id: &ResourceId,
        network_id: &ResourceId,
    ) -> ProviderResult<()> {
        self.ec2.attach_gateway(gateway_id, network_id).await
    }

    async fn detach_gateway(
        &self,
        gateway_id: &ResourceId,
        network_id: &ResourceId,
    ) -> ProviderResult<()> {
        self.ec2.detach_gateway(gateway_id, network_id).await
    }

    async fn associate_route_table(
        &self,
        table_id: &ResourceId,
        subnet_id: &ResourceId,
    ) -> ProviderResult<()> {
        self.ec2.associate_route_table(table_id, subnet_id).await
    }

    async fn create_route(
        &self,
        table_id: &ResourceId,
        gateway_id: &ResourceId,
        destination_cidr: &str,
    ) -> ProviderResult<()> {
        self.ec2
            .create_route(table_id, gateway_id, destination_cidr)
            .await
    }

    async fn authorize_ingress(
        &self,
        group_id: &ResourceId,
        rule: &IngressRule,
    ) -> ProviderResult<()> {
        self.ec2.authorize_ingress(group_id, rule).await
    }

    async fn revoke_ingress(&self, group_id: &ResourceId, rule: &IngressRule) -> ProviderResult<()> {
        self.ec2.revoke_ingress(group_id, rule).await
    }

    async fn change_record(
        &self,
        zone_id: &ResourceId,
        change: &RecordChange,
    ) -> ProviderResult<ResourceId> {
        self.route53.change_record(zone_id, change).await
    }
}

//! EC2 client
//!
//! Thin wrapper over `aws-sdk-ec2`: one method per call the provider needs,
//! with responses converted to the engine's remote types. Describe calls
//! filter on `tag:Name` and never paginate; a datacenter holds a handful of
//! resources per name.

use crate::error::{missing_field, sdk_error};
use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::{
    self as ec2, BlockDeviceMapping, EbsBlockDevice, Filter, InstanceNetworkInterfaceSpecification,
    InstanceType, IpPermission, IpRange, Placement, ResourceType, TagSpecification, Tenancy,
    UserIdGroupPair,
};
use dcflow_cloud::remote::{
    FirewallGroup, Gateway, Image, IngressRule, Instance, InstanceState, KeyPair, Network, Route,
    RouteTable, RuleTarget, Subnet,
};
use dcflow_cloud::{Created, NewInstance, ProviderResult, ResourceId};
use dcflow_core::{LogicalName, Tag, Tags};
use tracing::debug;

pub struct Ec2 {
    client: Client,
}

fn name_filter(name: &str) -> Filter {
    Filter::builder().name("tag:Name").values(name).build()
}

fn tag_specification(resource_type: ResourceType, tags: &Tags) -> TagSpecification {
    let tags = tags
        .iter()
        .map(|t| ec2::Tag::builder().key(&t.key).value(&t.value).build())
        .collect();
    TagSpecification::builder()
        .resource_type(resource_type)
        .set_tags(Some(tags))
        .build()
}

fn tags_from(tags: &[ec2::Tag]) -> Tags {
    tags.iter()
        .filter_map(|t| Some(Tag::new(t.key()?, t.value().unwrap_or_default())))
        .collect()
}

fn id_of(operation: &str, id: Option<&str>) -> ProviderResult<ResourceId> {
    id.map(ResourceId::from)
        .ok_or_else(|| missing_field(operation, "id"))
}

fn network_from(vpc: &ec2::Vpc) -> Option<Network> {
    Some(Network {
        id: vpc.vpc_id()?.into(),
        cidr: vpc.cidr_block().unwrap_or_default().to_string(),
        tags: tags_from(vpc.tags()),
    })
}

fn subnet_from(subnet: &ec2::Subnet) -> Option<Subnet> {
    Some(Subnet {
        id: subnet.subnet_id()?.into(),
        network_id: subnet.vpc_id().unwrap_or_default().into(),
        az: subnet.availability_zone().unwrap_or_default().to_string(),
        cidr: subnet.cidr_block().unwrap_or_default().to_string(),
        tags: tags_from(subnet.tags()),
    })
}

fn gateway_from(gateway: &ec2::InternetGateway) -> Option<Gateway> {
    Some(Gateway {
        id: gateway.internet_gateway_id()?.into(),
        attached_network_ids: gateway
            .attachments()
            .iter()
            .filter_map(|a| a.vpc_id())
            .map(ResourceId::from)
            .collect(),
        tags: tags_from(gateway.tags()),
    })
}

fn route_table_from(table: &ec2::RouteTable) -> Option<RouteTable> {
    Some(RouteTable {
        id: table.route_table_id()?.into(),
        network_id: table.vpc_id().unwrap_or_default().into(),
        routes: table
            .routes()
            .iter()
            .filter_map(|r| {
                Some(Route {
                    destination_cidr: r.destination_cidr_block()?.to_string(),
                    gateway_id: r.gateway_id().map(ResourceId::from),
                })
            })
            .collect(),
        associated_subnet_ids: table
            .associations()
            .iter()
            .filter_map(|a| a.subnet_id())
            .map(ResourceId::from)
            .collect(),
        tags: tags_from(table.tags()),
    })
}

/// One rule per CIDR range or group pair of each permission
fn rules_from(permissions: &[IpPermission]) -> Vec<IngressRule> {
    let mut rules = Vec::new();
    for permission in permissions {
        let from_port = permission.from_port().unwrap_or(-1);
        let to_port = permission.to_port().unwrap_or(-1);
        let protocol = permission.ip_protocol().unwrap_or("-1").to_string();

        for range in permission.ip_ranges() {
            if let Some(cidr) = range.cidr_ip() {
                rules.push(IngressRule {
                    from_port,
                    to_port,
                    protocol: protocol.clone(),
                    target: RuleTarget::Cidr(cidr.to_string()),
                    description: range.description().map(str::to_string),
                });
            }
        }
        for pair in permission.user_id_group_pairs() {
            if let Some(group_id) = pair.group_id() {
                rules.push(IngressRule {
                    from_port,
                    to_port,
                    protocol: protocol.clone(),
                    target: RuleTarget::Group(group_id.into()),
                    description: pair.description().map(str::to_string),
                });
            }
        }
    }
    rules
}

fn permission_for(rule: &IngressRule) -> IpPermission {
    let builder = IpPermission::builder()
        .ip_protocol(&rule.protocol)
        .from_port(rule.from_port)
        .to_port(rule.to_port);
    match &rule.target {
        RuleTarget::Cidr(cidr) => builder
            .ip_ranges(
                IpRange::builder()
                    .cidr_ip(cidr)
                    .set_description(rule.description.clone())
                    .build(),
            )
            .build(),
        RuleTarget::Group(group_id) => builder
            .user_id_group_pairs(
                UserIdGroupPair::builder()
                    .group_id(group_id.as_str())
                    .set_description(rule.description.clone())
                    .build(),
            )
            .build(),
    }
}

fn firewall_group_from(group: &ec2::SecurityGroup) -> Option<FirewallGroup> {
    Some(FirewallGroup {
        id: group.group_id()?.into(),
        group_name: group.group_name().unwrap_or_default().to_string(),
        network_id: group.vpc_id().unwrap_or_default().into(),
        rules: rules_from(group.ip_permissions()),
        tags: tags_from(group.tags()),
    })
}

fn instance_from(instance: &ec2::Instance) -> Option<Instance> {
    let state = instance
        .state()
        .and_then(|s| s.name())
        .map(|n| InstanceState::parse(n.as_str()))
        .unwrap_or_else(|| InstanceState::Other("unknown".to_string()));
    Some(Instance {
        id: instance.instance_id()?.into(),
        state,
        public_ip: instance.public_ip_address().map(str::to_string),
        private_ip: instance.private_ip_address().map(str::to_string),
        image_id: instance.image_id().map(ResourceId::from),
        subnet_id: instance.subnet_id().map(ResourceId::from),
        firewall_group_ids: instance
            .security_groups()
            .iter()
            .filter_map(|g| g.group_id())
            .map(ResourceId::from)
            .collect(),
        key_name: instance.key_name().map(str::to_string),
        tags: tags_from(instance.tags()),
    })
}

fn image_from(image: &ec2::Image) -> Option<Image> {
    Some(Image {
        id: image.image_id()?.into(),
        image_name: image.name().unwrap_or_default().to_string(),
        state: image
            .state()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        snapshot_ids: image
            .block_device_mappings()
            .iter()
            .filter_map(|m| m.ebs().and_then(|e| e.snapshot_id()))
            .map(ResourceId::from)
            .collect(),
        tags: tags_from(image.tags()),
    })
}

fn key_pair_from(key: &ec2::KeyPairInfo) -> Option<KeyPair> {
    Some(KeyPair {
        id: key.key_pair_id()?.into(),
        key_name: key.key_name().unwrap_or_default().to_string(),
        public_key: key.public_key().map(str::to_string),
        tags: tags_from(key.tags()),
    })
}

impl Ec2 {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    // networks

    pub async fn describe_networks(&self, name: &LogicalName) -> ProviderResult<Vec<Network>> {
        let output = self
            .client
            .describe_vpcs()
            .filters(name_filter(name.as_str()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output.vpcs().iter().filter_map(network_from).collect())
    }

    pub async fn network_available(&self, id: &ResourceId) -> ProviderResult<bool> {
        let output = self
            .client
            .describe_vpcs()
            .vpc_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .vpcs()
            .iter()
            .any(|v| v.state() == Some(&ec2::VpcState::Available)))
    }

    pub async fn create_network(&self, cidr: &str, tags: &Tags) -> ProviderResult<Created> {
        let output = self
            .client
            .create_vpc()
            .cidr_block(cidr)
            .tag_specifications(tag_specification(ResourceType::Vpc, tags))
            .send()
            .await
            .map_err(sdk_error)?;
        let id = id_of("CreateVpc", output.vpc().and_then(|v| v.vpc_id()))?;
        Ok(Created::new(id))
    }

    pub async fn delete_network(&self, id: &ResourceId) -> ProviderResult<()> {
        self.client
            .delete_vpc()
            .vpc_id(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    // subnets

    pub async fn describe_subnets(&self, name: &LogicalName) -> ProviderResult<Vec<Subnet>> {
        let output = self
            .client
            .describe_subnets()
            .filters(name_filter(name.as_str()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output.subnets().iter().filter_map(subnet_from).collect())
    }

    pub async fn subnet_available(&self, id: &ResourceId) -> ProviderResult<bool> {
        let output = self
            .client
            .describe_subnets()
            .subnet_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .subnets()
            .iter()
            .any(|s| s.state() == Some(&ec2::SubnetState::Available)))
    }

    pub async fn create_subnet(
        &self,
        network_id: &ResourceId,
        az: &str,
        cidr: &str,
        tags: &Tags,
    ) -> ProviderResult<Created> {
        let output = self
            .client
            .create_subnet()
            .vpc_id(network_id.as_str())
            .availability_zone(az)
            .cidr_block(cidr)
            .tag_specifications(tag_specification(ResourceType::Subnet, tags))
            .send()
            .await
            .map_err(sdk_error)?;
        let id = id_of("CreateSubnet", output.subnet().and_then(|s| s.subnet_id()))?;
        Ok(Created::new(id))
    }

    pub async fn delete_subnet(&self, id: &ResourceId) -> ProviderResult<()> {
        self.client
            .delete_subnet()
            .subnet_id(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    // internet gateways

    pub async fn describe_gateways(&self, name: &LogicalName) -> ProviderResult<Vec<Gateway>> {
        let output = self
            .client
            .describe_internet_gateways()
            .filters(name_filter(name.as_str()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .internet_gateways()
            .iter()
            .filter_map(gateway_from)
            .collect())
    }

    pub async fn gateway_exists(&self, id: &ResourceId) -> ProviderResult<bool> {
        let output = self
            .client
            .describe_internet_gateways()
            .internet_gateway_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(!output.internet_gateways().is_empty())
    }

    pub async fn create_gateway(&self, tags: &Tags) -> ProviderResult<Created> {
        let output = self
            .client
            .create_internet_gateway()
            .tag_specifications(tag_specification(ResourceType::InternetGateway, tags))
            .send()
            .await
            .map_err(sdk_error)?;
        let id = id_of(
            "CreateInternetGateway",
            output
                .internet_gateway()
                .and_then(|g| g.internet_gateway_id()),
        )?;
        Ok(Created::new(id))
    }

    pub async fn attach_gateway(
        &self,
        gateway_id: &ResourceId,
        network_id: &ResourceId,
    ) -> ProviderResult<()> {
        self.client
            .attach_internet_gateway()
            .internet_gateway_id(gateway_id.as_str())
            .vpc_id(network_id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    pub async fn detach_gateway(
        &self,
        gateway_id: &ResourceId,
        network_id: &ResourceId,
    ) -> ProviderResult<()> {
        self.client
            .detach_internet_gateway()
            .internet_gateway_id(gateway_id.as_str())
            .vpc_id(network_id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    pub async fn delete_gateway(&self, id: &ResourceId) -> ProviderResult<()> {
        self.client
            .delete_internet_gateway()
            .internet_gateway_id(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    // route tables

    pub async fn describe_route_tables(
        &self,
        name: &LogicalName,
    ) -> ProviderResult<Vec<RouteTable>> {
        let output = self
            .client
            .describe_route_tables()
            .filters(name_filter(name.as_str()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .route_tables()
            .iter()
            .filter_map(route_table_from)
            .collect())
    }

    pub async fn route_table_exists(&self, id: &ResourceId) -> ProviderResult<bool> {
        let output = self
            .client
            .describe_route_tables()
            .route_table_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(!output.route_tables().is_empty())
    }

    pub async fn create_route_table(
        &self,
        network_id: &ResourceId,
        tags: &Tags,
    ) -> ProviderResult<Created> {
        let output = self
            .client
            .create_route_table()
            .vpc_id(network_id.as_str())
            .tag_specifications(tag_specification(ResourceType::RouteTable, tags))
            .send()
            .await
            .map_err(sdk_error)?;
        let id = id_of(
            "CreateRouteTable",
            output.route_table().and_then(|t| t.route_table_id()),
        )?;
        Ok(Created::new(id))
    }

    pub async fn associate_route_table(
        &self,
        table_id: &ResourceId,
        subnet_id: &ResourceId,
    ) -> ProviderResult<()> {
        let output = self
            .client
            .associate_route_table()
            .route_table_id(table_id.as_str())
            .subnet_id(subnet_id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        debug!(association = ?output.association_id(), "Route table association");
        Ok(())
    }

    pub async fn create_route(
        &self,
        table_id: &ResourceId,
        gateway_id: &ResourceId,
        destination_cidr: &str,
    ) -> ProviderResult<()> {
        self.client
            .create_route()
            .route_table_id(table_id.as_str())
            .gateway_id(gateway_id.as_str())
            .destination_cidr_block(destination_cidr)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    pub async fn delete_route_table(&self, id: &ResourceId) -> ProviderResult<()> {
        self.client
            .delete_route_table()
            .route_table_id(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    // security groups

    pub async fn describe_firewall_groups(
        &self,
        name: &LogicalName,
    ) -> ProviderResult<Vec<FirewallGroup>> {
        let output = self
            .client
            .describe_security_groups()
            .filters(name_filter(name.as_str()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .security_groups()
            .iter()
            .filter_map(firewall_group_from)
            .collect())
    }

    pub async fn describe_ingress_rules(
        &self,
        group_id: &ResourceId,
    ) -> ProviderResult<Vec<IngressRule>> {
        let output = self
            .client
            .describe_security_groups()
            .group_ids(group_id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .security_groups()
            .iter()
            .flat_map(|g| rules_from(g.ip_permissions()))
            .collect())
    }

    pub async fn firewall_group_exists(&self, id: &ResourceId) -> ProviderResult<bool> {
        let output = self
            .client
            .describe_security_groups()
            .group_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(!output.security_groups().is_empty())
    }

    pub async fn create_firewall_group(
        &self,
        network_id: &ResourceId,
        group_name: &str,
        description: &str,
        tags: &Tags,
    ) -> ProviderResult<Created> {
        let output = self
            .client
            .create_security_group()
            .vpc_id(network_id.as_str())
            .group_name(group_name)
            .description(description)
            .tag_specifications(tag_specification(ResourceType::SecurityGroup, tags))
            .send()
            .await
            .map_err(sdk_error)?;
        let id = id_of("CreateSecurityGroup", output.group_id())?;
        Ok(Created::new(id))
    }

    pub async fn authorize_ingress(
        &self,
        group_id: &ResourceId,
        rule: &IngressRule,
    ) -> ProviderResult<()> {
        self.client
            .authorize_security_group_ingress()
            .group_id(group_id.as_str())
            .ip_permissions(permission_for(rule))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    pub async fn revoke_ingress(
        &self,
        group_id: &ResourceId,
        rule: &IngressRule,
    ) -> ProviderResult<()> {
        self.client
            .revoke_security_group_ingress()
            .group_id(group_id.as_str())
            .ip_permissions(permission_for(rule))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    pub async fn delete_firewall_group(&self, id: &ResourceId) -> ProviderResult<()> {
        self.client
            .delete_security_group()
            .group_id(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    // instances

    pub async fn describe_instances(&self, name: &LogicalName) -> ProviderResult<Vec<Instance>> {
        let output = self
            .client
            .describe_instances()
            .filters(name_filter(name.as_str()))
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .filter_map(instance_from)
            .collect())
    }

    pub async fn instance_state(&self, id: &ResourceId) -> ProviderResult<Option<InstanceState>> {
        let output = self
            .client
            .describe_instances()
            .instance_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .find_map(instance_from)
            .map(|i| i.state))
    }

    pub async fn run_instance(&self, launch: &NewInstance, tags: &Tags) -> ProviderResult<Created> {
        let interface = InstanceNetworkInterfaceSpecification::builder()
            .device_index(0)
            .subnet_id(launch.subnet_id.as_str())
            .private_ip_address(&launch.private_ip)
            .associate_public_ip_address(true)
            .delete_on_termination(true)
            .set_groups(Some(
                launch
                    .firewall_group_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect(),
            ))
            .build();
        let volume = BlockDeviceMapping::builder()
            .device_name(&launch.device)
            .ebs(
                EbsBlockDevice::builder()
                    .volume_size(launch.volume_size)
                    .delete_on_termination(true)
                    .build(),
            )
            .build();

        let output = self
            .client
            .run_instances()
            .image_id(launch.image_id.as_str())
            .instance_type(InstanceType::from(launch.instance_type.as_str()))
            .min_count(1)
            .max_count(1)
            .key_name(&launch.key_name)
            .user_data(&launch.user_data)
            .placement(
                Placement::builder()
                    .tenancy(Tenancy::from(launch.tenancy.as_str()))
                    .build(),
            )
            .network_interfaces(interface)
            .block_device_mappings(volume)
            .tag_specifications(tag_specification(ResourceType::Instance, tags))
            .send()
            .await
            .map_err(sdk_error)?;
        let id = id_of(
            "RunInstances",
            output.instances().first().and_then(|i| i.instance_id()),
        )?;
        Ok(Created::new(id))
    }

    pub async fn terminate_instance(&self, id: &ResourceId) -> ProviderResult<()> {
        self.client
            .terminate_instances()
            .instance_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }

    // images

    pub async fn describe_images_tagged(&self, name: &LogicalName) -> ProviderResult<Vec<Image>> {
        self.describe_images(name_filter(name.as_str())).await
    }

    pub async fn describe_images_named(&self, image_name: &str) -> ProviderResult<Vec<Image>> {
        self.describe_images(Filter::builder().name("name").values(image_name).build())
            .await
    }

    async fn describe_images(&self, filter: Filter) -> ProviderResult<Vec<Image>> {
        let output = self
            .client
            .describe_images()
            .owners("self")
            .filters(filter)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output.images().iter().filter_map(image_from).collect())
    }

    pub async fn image(&self, id: &ResourceId) -> ProviderResult<Option<Image>> {
        let output = self
            .client
            .describe_images()
            .image_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output.images().iter().find_map(image_from))
    }

    pub async fn create_image(
        &self,
        instance_id: &ResourceId,
        image_name: &str,
        description: Option<&str>,
        tags: &Tags,
    ) -> ProviderResult<Created> {
        let output = self
            .client
            .create_image()
            .instance_id(instance_id.as_str())
            .name(image_name)
            .set_description(description.map(str::to_string))
            .tag_specifications(tag_specification(ResourceType::Image, tags))
            .send()
            .await
            .map_err(sdk_error)?;
        let id = id_of("CreateImage", output.image_id())?;
        Ok(Created::new(id))
    }

    /// Deregister the image, then delete the snapshots it was backed by
    pub async fn delete_image(&self, id: &ResourceId) -> ProviderResult<()> {
        let snapshots = self
            .image(id)
            .await?
            .map(|i| i.snapshot_ids)
            .unwrap_or_default();

        self.client
            .deregister_image()
            .image_id(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;

        for snapshot in snapshots {
            self.client
                .delete_snapshot()
                .snapshot_id(snapshot.as_str())
                .send()
                .await
                .map_err(sdk_error)?;
            debug!(%snapshot, "Snapshot deleted");
        }
        Ok(())
    }

    // key pairs

    pub async fn describe_key_pairs(&self, name: &LogicalName) -> ProviderResult<Vec<KeyPair>> {
        let output = self
            .client
            .describe_key_pairs()
            .filters(name_filter(name.as_str()))
            .include_public_key(true)
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output.key_pairs().iter().filter_map(key_pair_from).collect())
    }

    pub async fn key_pair_exists(&self, id: &ResourceId) -> ProviderResult<bool> {
        let output = self
            .client
            .describe_key_pairs()
            .key_pair_ids(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(!output.key_pairs().is_empty())
    }

    /// The private key material is only part of this response
    pub async fn create_key_pair(&self, key_name: &str, tags: &Tags) -> ProviderResult<Created> {
        let output = self
            .client
            .create_key_pair()
            .key_name(key_name)
            .tag_specifications(tag_specification(ResourceType::KeyPair, tags))
            .send()
            .await
            .map_err(sdk_error)?;
        let id = id_of("CreateKeyPair", output.key_pair_id())?;
        Ok(Created {
            id,
            secret: output.key_material().map(str::to_string),
        })
    }

    pub async fn delete_key_pair(&self, id: &ResourceId) -> ProviderResult<()> {
        self.client
            .delete_key_pair()
            .key_pair_id(id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(key: &str, value: &str) -> ec2::Tag {
        ec2::Tag::builder().key(key).value(value).build()
    }

    #[test]
    fn test_tags_keep_order_and_skip_keyless() {
        let tags = tags_from(&[
            tag("Name", "N"),
            ec2::Tag::builder().value("orphan").build(),
            tag("class", "webservices"),
        ]);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.name(), Some("N"));
        assert_eq!(tags.get("class"), Some("webservices"));
    }

    #[test]
    fn test_security_group_permissions_are_flattened() {
        let permission = IpPermission::builder()
            .ip_protocol("tcp")
            .from_port(80)
            .to_port(90)
            .ip_ranges(IpRange::builder().cidr_ip("10.0.0.0/24").build())
            .ip_ranges(IpRange::builder().cidr_ip("0.0.0.0/0").build())
            .user_id_group_pairs(UserIdGroupPair::builder().group_id("sg-2").build())
            .build();
        let group = ec2::SecurityGroup::builder()
            .group_id("sg-1")
            .group_name("G")
            .vpc_id("vpc-1")
            .ip_permissions(permission)
            .tags(tag("Name", "G"))
            .build();

        let group = firewall_group_from(&group).unwrap();
        assert_eq!(group.rules.len(), 3);
        assert_eq!(group.rules[0].target, RuleTarget::Cidr("10.0.0.0/24".into()));
        assert_eq!(group.rules[2].target, RuleTarget::Group("sg-2".into()));
        assert!(group.rules.iter().all(|r| r.from_port == 80 && r.to_port == 90));
    }

    #[test]
    fn test_rule_round_trips_through_permission() {
        let rule = IngressRule {
            from_port: 8080,
            to_port: 8080,
            protocol: "tcp".into(),
            target: RuleTarget::Group("sg-7".into()),
            description: Some("web".into()),
        };
        let rules = rules_from(&[permission_for(&rule)]);
        assert_eq!(rules, vec![rule]);
    }

    #[test]
    fn test_gateway_attachments() {
        let gateway = ec2::InternetGateway::builder()
            .internet_gateway_id("igw-1")
            .attachments(ec2::InternetGatewayAttachment::builder().vpc_id("vpc-1").build())
            .build();
        let gateway = gateway_from(&gateway).unwrap();
        assert!(gateway.is_attached_to(&"vpc-1".into()));
    }

    #[test]
    fn test_instance_state_and_addresses() {
        let instance = ec2::Instance::builder()
            .instance_id("i-1")
            .state(
                ec2::InstanceState::builder()
                    .name(ec2::InstanceStateName::ShuttingDown)
                    .build(),
            )
            .private_ip_address("10.0.0.10")
            .security_groups(ec2::GroupIdentifier::builder().group_id("sg-1").build())
            .build();
        let instance = instance_from(&instance).unwrap();
        assert_eq!(instance.state, InstanceState::ShuttingDown);
        assert!(!instance.state.is_live());
        assert_eq!(instance.public_ip, None);
        assert_eq!(instance.firewall_group_ids, vec![ResourceId::from("sg-1")]);
    }

    #[test]
    fn test_resource_without_id_is_ignored() {
        let vpc = ec2::Vpc::builder().cidr_block("10.0.0.0/16").build();
        assert!(network_from(&vpc).is_none());
    }
}

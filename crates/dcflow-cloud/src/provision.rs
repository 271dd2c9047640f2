//! Forward pass: walk the dependency graph and create what is missing
//!
//! Each step only runs once the identifiers it depends on are resolved.
//! The first failure aborts the pass; re-running picks up where it stopped.

use crate::accessors::{
    DEFAULT_ROUTE_CIDR, FirewallGroupAccessor, FirewallGroupRequest, GatewayAccessor,
    GatewayRequest, InstanceAccessor, InstanceRequest, KeyPairAccessor, KeyPairRequest,
    NetworkAccessor, NetworkRequest, RouteTableAccessor, RouteTableRequest, SubnetAccessor,
    SubnetRequest,
};
use crate::engine::{Engine, log_abort, record_ensured};
use crate::error::{CloudError, ProviderError, Result};
use crate::lookup::{Accessor, ensure_created, ensure_created_with};
use crate::provider::NewInstance;
use crate::remote::{ResourceId, ResourceKind};
use crate::report::{InstanceInventory, Report, StepOutcome};
use dcflow_core::{BootParams, Datacenter, HostedZoneSpec, InstanceSpec, LogicalName};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Result of a successful provisioning pass
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    pub report: Report,
    pub inventory: Vec<InstanceInventory>,
}

impl Engine {
    /// Create every declared resource that does not exist yet
    #[instrument(skip_all, fields(network = %datacenter.network.name))]
    pub async fn provision(
        &self,
        datacenter: &Datacenter,
        hosted_zone: &HostedZoneSpec,
    ) -> Result<ProvisionOutcome> {
        info!("Creating datacenter ...");
        let mut report = Report::new();
        let inventory = log_abort(
            "provision",
            self.run_provision(datacenter, hosted_zone, &mut report).await,
        )?;
        report.finish();
        info!(summary = %report.summary(), "Datacenter created");
        Ok(ProvisionOutcome { report, inventory })
    }

    async fn run_provision(
        &self,
        dc: &Datacenter,
        hosted_zone: &HostedZoneSpec,
        report: &mut Report,
    ) -> Result<Vec<InstanceInventory>> {
        // network
        let request = NetworkRequest {
            cidr: dc.network.cidr.clone(),
            tags: dc.network.tags.clone(),
        };
        let ensured = ensure_created(&self.networks, &dc.network.name, &request).await?;
        record_ensured::<NetworkAccessor>(report, &dc.network.name, &ensured);
        let network = ensured.into_inner();

        // gateway, attached to the network
        let request = GatewayRequest {
            tags: dc.gateway.tags.clone(),
        };
        let ensured = ensure_created(&self.gateways, &dc.gateway.name, &request).await?;
        record_ensured::<GatewayAccessor>(report, &dc.gateway.name, &ensured);
        let gateway = ensured.into_inner();
        if !self.gateways.is_attached_to(&gateway, &network.id) {
            self.gateways.attach(&gateway.id, &network.id).await?;
            report.record(
                ResourceKind::Gateway,
                dc.gateway.name.as_str(),
                StepOutcome::Attached,
            );
        }

        // route table with the default route to the gateway
        let request = RouteTableRequest {
            network_id: network.id.clone(),
            tags: dc.route_table.tags.clone(),
        };
        let ensured = ensure_created(&self.route_tables, &dc.route_table.name, &request).await?;
        record_ensured::<RouteTableAccessor>(report, &dc.route_table.name, &ensured);
        let table = ensured.into_inner();
        if !self
            .route_tables
            .has_route(&table, &gateway.id, DEFAULT_ROUTE_CIDR)
        {
            self.route_tables
                .create_route(&table.id, &gateway.id, DEFAULT_ROUTE_CIDR)
                .await?;
            report.record(
                ResourceKind::RouteTable,
                dc.route_table.name.as_str(),
                StepOutcome::RouteAdded,
            );
        }

        // subnets, each associated with the route table
        let mut subnet_ids = HashMap::new();
        for spec in &dc.subnets {
            let request = SubnetRequest {
                network_id: network.id.clone(),
                az: spec.az.clone(),
                cidr: spec.cidr.clone(),
                tags: spec.tags.clone(),
            };
            let ensured = ensure_created(&self.subnets, &spec.name, &request).await?;
            record_ensured::<SubnetAccessor>(report, &spec.name, &ensured);
            let subnet = ensured.into_inner();

            if !self.route_tables.has_association(&table, &subnet.id) {
                self.route_tables.associate(&table.id, &subnet.id).await?;
                report.record(
                    ResourceKind::Subnet,
                    spec.name.as_str(),
                    StepOutcome::Associated,
                );
            }
            subnet_ids.insert(spec.name.clone(), subnet.id);
        }

        // security groups first, rules second: a rule may name any group
        let mut group_ids = HashMap::new();
        for spec in &dc.firewall_groups {
            let request = FirewallGroupRequest {
                network_id: network.id.clone(),
                description: spec.description.clone(),
                tags: spec.tags.clone(),
            };
            let ensured = ensure_created(&self.firewall_groups, &spec.name, &request).await?;
            record_ensured::<FirewallGroupAccessor>(report, &spec.name, &ensured);
            group_ids.insert(spec.name.clone(), ensured.into_inner().id);
        }
        for spec in &dc.firewall_groups {
            let group_id = group_ids
                .get(&spec.name)
                .ok_or_else(|| unresolved(ResourceKind::FirewallGroup, &spec.name))?;
            for rule in &spec.rules {
                let key = self.rule_key(rule, &group_ids)?;
                let created = self
                    .rules
                    .ensure_created(group_id, &key, rule.description())
                    .await?;
                let outcome = if created {
                    StepOutcome::Created
                } else {
                    StepOutcome::Unchanged
                };
                report.record(
                    ResourceKind::FirewallRule,
                    format!("{}: {}", spec.name, key),
                    outcome,
                );
            }
        }

        // one key pair per instance
        for spec in &dc.instances {
            let name = spec.credential_name();
            let ensured = ensure_created(&self.key_pairs, name, &KeyPairRequest::default()).await?;
            record_ensured::<KeyPairAccessor>(report, name, &ensured);
        }

        // instances
        for spec in &dc.instances {
            let ensured = ensure_created_with(&self.instances, &spec.name, || {
                self.instance_request(spec, &subnet_ids, &group_ids)
            })
            .await?;
            record_ensured::<InstanceAccessor>(report, &spec.name, &ensured);
        }

        self.publish_records(dc, hosted_zone, report).await
    }

    /// Resolve everything an instance launch needs and render its boot payload
    async fn instance_request(
        &self,
        spec: &InstanceSpec,
        subnet_ids: &HashMap<LogicalName, ResourceId>,
        group_ids: &HashMap<LogicalName, ResourceId>,
    ) -> Result<InstanceRequest> {
        let image = self
            .images
            .find_by_image_name(&spec.parent_image)
            .await?
            .ok_or_else(|| CloudError::Unresolved {
                kind: ResourceKind::Image,
                name: spec.parent_image.clone(),
            })?;

        let group_id = group_ids
            .get(&spec.firewall_group)
            .ok_or_else(|| unresolved(ResourceKind::FirewallGroup, &spec.firewall_group))?;
        let subnet_id = subnet_ids
            .get(&spec.subnet)
            .ok_or_else(|| unresolved(ResourceKind::Subnet, &spec.subnet))?;

        let key_name = spec.credential_name();
        let key_pair = self
            .key_pairs
            .find(key_name)
            .await?
            .ok_or_else(|| unresolved(ResourceKind::KeyPair, key_name))?;
        let public_key = key_pair.public_key.ok_or_else(|| {
            CloudError::provider(
                "Error loading the key pair!",
                ProviderError::not_found(format!("no public key for key pair {}", key_name)),
            )
        })?;

        let user_data = self.boot_template.render_encoded(&BootParams {
            username: &spec.user_name,
            hostname: &spec.host_name,
            password: &spec.user_password,
            public_key: &public_key,
        })?;

        Ok(InstanceRequest {
            launch: NewInstance {
                image_id: image.id,
                instance_type: spec.instance_type().to_string(),
                subnet_id: subnet_id.clone(),
                private_ip: spec.private_ip.clone(),
                firewall_group_ids: vec![group_id.clone()],
                key_name: key_name.to_string(),
                user_data,
                volume_size: spec.volume_size(),
                device: spec.device().to_string(),
                tenancy: spec.tenancy().to_string(),
            },
            tags: spec.tags.clone(),
        })
    }
}

fn unresolved(kind: ResourceKind, name: &LogicalName) -> CloudError {
    CloudError::Unresolved {
        kind,
        name: name.to_string(),
    }
}

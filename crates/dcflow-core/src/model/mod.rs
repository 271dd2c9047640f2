//! Declarative datacenter model
//!
//! The model is loaded once per run and never mutated afterwards. Every
//! resource carries a [`LogicalName`], the value of its `Name` tag on the
//! provider side.

mod firewall;
mod instance;
mod network;
mod tag;

pub use firewall::{CidrRule, FirewallGroupSpec, GroupRule, RuleSpec};
pub use instance::{
    DEFAULT_DEVICE, DEFAULT_INSTANCE_TYPE, DEFAULT_TENANCY, DEFAULT_VOLUME_SIZE_GIB,
    InstanceDnsSpec, InstanceSpec,
};
pub use network::{GatewaySpec, NetworkSpec, RouteTableSpec, SubnetSpec};
pub use tag::{LogicalName, NAME_TAG, Tag, Tags};

use serde::{Deserialize, Serialize};

/// The whole datacenter topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Datacenter {
    #[serde(rename = "VPC", alias = "Network")]
    pub network: NetworkSpec,
    #[serde(rename = "InternetGateway", alias = "Gateway")]
    pub gateway: GatewaySpec,
    pub route_table: RouteTableSpec,
    #[serde(default)]
    pub subnets: Vec<SubnetSpec>,
    #[serde(rename = "SecurityGroups", alias = "FirewallGroups", default)]
    pub firewall_groups: Vec<FirewallGroupSpec>,
    #[serde(default)]
    pub instances: Vec<InstanceSpec>,
}

impl Datacenter {
    pub fn subnet(&self, name: &LogicalName) -> Option<&SubnetSpec> {
        self.subnets.iter().find(|s| &s.name == name)
    }

    pub fn firewall_group(&self, name: &LogicalName) -> Option<&FirewallGroupSpec> {
        self.firewall_groups.iter().find(|g| &g.name == name)
    }

    pub fn instance(&self, name: &LogicalName) -> Option<&InstanceSpec> {
        self.instances.iter().find(|i| &i.name == name)
    }
}

/// The DNS hosted zone instances are published in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZoneSpec {
    #[serde(default)]
    pub registered_domain: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl HostedZoneSpec {
    /// `false` when no domain is registered; DNS reconciliation is skipped
    pub fn is_enabled(&self) -> bool {
        self.registered_domain
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

//! Provider-side live resources
//!
//! These values only come out of a describe or create call; the engine
//! never builds them from configuration.

use dcflow_core::Tags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque provider identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kinds of resource the engine manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Network,
    Subnet,
    Gateway,
    RouteTable,
    FirewallGroup,
    FirewallRule,
    Instance,
    Image,
    KeyPair,
    HostedZone,
    DnsRecord,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Network => "VPC",
            ResourceKind::Subnet => "subnet",
            ResourceKind::Gateway => "internet gateway",
            ResourceKind::RouteTable => "route table",
            ResourceKind::FirewallGroup => "security group",
            ResourceKind::FirewallRule => "security group rule",
            ResourceKind::Instance => "instance",
            ResourceKind::Image => "image",
            ResourceKind::KeyPair => "key pair",
            ResourceKind::HostedZone => "hosted zone",
            ResourceKind::DnsRecord => "DNS record",
        };
        f.write_str(name)
    }
}

/// States a provider wait can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Available,
    Running,
    Terminated,
    Deleted,
    InSync,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminalState::Available => "available",
            TerminalState::Running => "running",
            TerminalState::Terminated => "terminated",
            TerminalState::Deleted => "deleted",
            TerminalState::InSync => "INSYNC",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub id: ResourceId,
    pub cidr: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub id: ResourceId,
    pub network_id: ResourceId,
    pub az: String,
    pub cidr: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    pub id: ResourceId,
    pub attached_network_ids: Vec<ResourceId>,
    pub tags: Tags,
}

impl Gateway {
    pub fn is_attached_to(&self, network_id: &ResourceId) -> bool {
        self.attached_network_ids.contains(network_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub destination_cidr: String,
    pub gateway_id: Option<ResourceId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub id: ResourceId,
    pub network_id: ResourceId,
    pub routes: Vec<Route>,
    pub associated_subnet_ids: Vec<ResourceId>,
    pub tags: Tags,
}

impl RouteTable {
    pub fn has_route(&self, gateway_id: &ResourceId, destination_cidr: &str) -> bool {
        self.routes.iter().any(|r| {
            r.destination_cidr == destination_cidr && r.gateway_id.as_ref() == Some(gateway_id)
        })
    }

    pub fn is_associated_with(&self, subnet_id: &ResourceId) -> bool {
        self.associated_subnet_ids.contains(subnet_id)
    }
}

/// Source an inbound rule grants access from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleTarget {
    Cidr(String),
    Group(ResourceId),
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTarget::Cidr(cidr) => f.write_str(cidr),
            RuleTarget::Group(id) => write!(f, "group {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressRule {
    pub from_port: i32,
    pub to_port: i32,
    pub protocol: String,
    pub target: RuleTarget,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallGroup {
    pub id: ResourceId,
    pub group_name: String,
    pub network_id: ResourceId,
    pub rules: Vec<IngressRule>,
    pub tags: Tags,
}

/// Instance lifecycle state as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    Other(String),
}

impl InstanceState {
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            other => Self::Other(other.to_string()),
        }
    }

    /// Instances on their way out are not considered live
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::ShuttingDown | Self::Terminated)
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Other(other) => other,
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: ResourceId,
    pub state: InstanceState,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub image_id: Option<ResourceId>,
    pub subnet_id: Option<ResourceId>,
    pub firewall_group_ids: Vec<ResourceId>,
    pub key_name: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: ResourceId,
    pub image_name: String,
    pub state: String,
    pub snapshot_ids: Vec<ResourceId>,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub id: ResourceId,
    pub key_name: String,
    pub public_key: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    pub id: ResourceId,
    pub domain: String,
}

impl HostedZone {
    pub fn matches(&self, domain: &str) -> bool {
        dns_name_eq(&self.domain, domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub name: String,
    pub record_type: String,
    pub ttl: i64,
    pub values: Vec<String>,
}

impl DnsRecord {
    pub fn a(name: impl Into<String>, address: impl Into<String>, ttl: i64) -> Self {
        Self {
            name: name.into(),
            record_type: "A".to_string(),
            ttl,
            values: vec![address.into()],
        }
    }
}

/// Compare DNS names ignoring case and the trailing root dot
pub fn dns_name_eq(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}

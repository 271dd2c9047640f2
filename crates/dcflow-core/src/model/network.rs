//! Network topology specs: network, gateway, route table and subnets

use super::tag::{LogicalName, Tags};
use serde::{Deserialize, Serialize};

/// Isolated address space (VPC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkSpec {
    pub name: LogicalName,
    pub cidr: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

/// Internet-facing attachment point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewaySpec {
    pub name: LogicalName,
    #[serde(default)]
    pub tags: Tags,
}

/// Route table holding the default route to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTableSpec {
    pub name: LogicalName,
    #[serde(default)]
    pub tags: Tags,
}

/// Address subrange bound to an availability zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetSpec {
    pub name: LogicalName,
    pub az: String,
    pub cidr: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

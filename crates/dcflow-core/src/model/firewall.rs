//! Firewall group specs and their inbound rules

use super::tag::{LogicalName, Tags};
use serde::{Deserialize, Serialize};

/// Stateful firewall rule container (security group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallGroupSpec {
    pub name: LogicalName,
    pub description: String,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// Inbound rule granting access from an address range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CidrRule {
    pub from_port: i32,
    pub to_port: i32,
    pub protocol: String,
    pub cidr: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Inbound rule granting access from members of another firewall group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupRule {
    pub from_port: i32,
    pub to_port: i32,
    pub protocol: String,
    #[serde(rename = "SgpName", alias = "GroupName")]
    pub group_name: LogicalName,
    #[serde(default)]
    pub description: Option<String>,
}

/// A declared rule; a rule naming a group is a [`GroupRule`], anything
/// else is a [`CidrRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum RuleSpec {
    Cidr(CidrRule),
    Group(GroupRule),
}

impl RuleSpec {
    pub fn ports(&self) -> (i32, i32) {
        match self {
            RuleSpec::Cidr(r) => (r.from_port, r.to_port),
            RuleSpec::Group(r) => (r.from_port, r.to_port),
        }
    }

    pub fn protocol(&self) -> &str {
        match self {
            RuleSpec::Cidr(r) => &r.protocol,
            RuleSpec::Group(r) => &r.protocol,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            RuleSpec::Cidr(r) => r.description.as_deref(),
            RuleSpec::Group(r) => r.description.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRule {
    from_port: i32,
    to_port: i32,
    protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cidr: Option<String>,
    #[serde(
        default,
        rename = "SgpName",
        alias = "GroupName",
        skip_serializing_if = "Option::is_none"
    )]
    group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl TryFrom<RawRule> for RuleSpec {
    type Error = String;

    fn try_from(raw: RawRule) -> std::result::Result<Self, Self::Error> {
        match (raw.group_name, raw.cidr) {
            (Some(group_name), None) => Ok(RuleSpec::Group(GroupRule {
                from_port: raw.from_port,
                to_port: raw.to_port,
                protocol: raw.protocol,
                group_name: LogicalName::new(group_name),
                description: raw.description,
            })),
            (None, Some(cidr)) => Ok(RuleSpec::Cidr(CidrRule {
                from_port: raw.from_port,
                to_port: raw.to_port,
                protocol: raw.protocol,
                cidr,
                description: raw.description,
            })),
            (Some(_), Some(_)) => Err("a rule cannot declare both Cidr and SgpName".to_string()),
            (None, None) => Err("a rule must declare either Cidr or SgpName".to_string()),
        }
    }
}

impl From<RuleSpec> for RawRule {
    fn from(rule: RuleSpec) -> Self {
        match rule {
            RuleSpec::Cidr(r) => RawRule {
                from_port: r.from_port,
                to_port: r.to_port,
                protocol: r.protocol,
                cidr: Some(r.cidr),
                group_name: None,
                description: r.description,
            },
            RuleSpec::Group(r) => RawRule {
                from_port: r.from_port,
                to_port: r.to_port,
                protocol: r.protocol,
                cidr: None,
                group_name: Some(r.group_name.as_str().to_string()),
                description: r.description,
            },
        }
    }
}

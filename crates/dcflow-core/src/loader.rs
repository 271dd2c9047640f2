//! Configuration loading
//!
//! Reads the datacenter and hosted zone files, fills defaults and validates
//! every cross reference before anything talks to the provider.

use crate::error::{ModelError, Result};
use crate::model::{Datacenter, HostedZoneSpec, LogicalName, RuleSpec, Tags};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DatacenterFile {
    datacenter: Datacenter,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HostedZoneFile {
    hosted_zone: HostedZoneSpec,
}

/// Load and validate a datacenter configuration file
#[instrument(fields(path = %path.display()))]
pub fn load_datacenter(path: &Path) -> Result<Datacenter> {
    let content = read(path)?;
    let datacenter = parse_datacenter(&content, path)?;
    info!(
        network = %datacenter.network.name,
        subnets = datacenter.subnets.len(),
        firewall_groups = datacenter.firewall_groups.len(),
        instances = datacenter.instances.len(),
        "Datacenter configuration loaded"
    );
    Ok(datacenter)
}

/// Load a hosted zone configuration file
#[instrument(fields(path = %path.display()))]
pub fn load_hosted_zone(path: &Path) -> Result<HostedZoneSpec> {
    let content = read(path)?;
    let zone = parse_hosted_zone(&content, path)?;
    info!(
        domain = zone.registered_domain.as_deref().unwrap_or("<none>"),
        "Hosted zone configuration loaded"
    );
    Ok(zone)
}

/// Parse datacenter JSON; `path` is only used in error messages
pub fn parse_datacenter(content: &str, path: &Path) -> Result<Datacenter> {
    let file: DatacenterFile =
        serde_json::from_str(content).map_err(|e| ModelError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let mut datacenter = file.datacenter;
    fill_defaults(&mut datacenter);
    validate(&datacenter)?;
    Ok(datacenter)
}

/// Parse hosted zone JSON; `path` is only used in error messages
pub fn parse_hosted_zone(content: &str, path: &Path) -> Result<HostedZoneSpec> {
    let file: HostedZoneFile =
        serde_json::from_str(content).map_err(|e| ModelError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(file.hosted_zone)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ModelError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn fill_defaults(datacenter: &mut Datacenter) {
    let network = datacenter.network.name.clone();
    for instance in &mut datacenter.instances {
        if instance.network.is_none() {
            debug!(instance = %instance.name, "Defaulting instance network");
            instance.network = Some(network.clone());
        }
        if instance.credential.is_none() {
            instance.credential = Some(instance.name.clone());
        }
    }
}

/// Check names, identity tags and references
pub fn validate(datacenter: &Datacenter) -> Result<()> {
    check_name("VPC", &datacenter.network.name, &datacenter.network.tags)?;
    require("VPC", "Cidr", &datacenter.network.cidr)?;
    check_name(
        "InternetGateway",
        &datacenter.gateway.name,
        &datacenter.gateway.tags,
    )?;
    check_name(
        "RouteTable",
        &datacenter.route_table.name,
        &datacenter.route_table.tags,
    )?;

    let mut subnets = HashSet::new();
    for subnet in &datacenter.subnets {
        check_name("Subnet", &subnet.name, &subnet.tags)?;
        require(subnet.name.as_str(), "Az", &subnet.az)?;
        require(subnet.name.as_str(), "Cidr", &subnet.cidr)?;
        unique("subnet", &subnet.name, &mut subnets)?;
    }

    let mut groups = HashSet::new();
    for group in &datacenter.firewall_groups {
        check_name("SecurityGroup", &group.name, &group.tags)?;
        require(group.name.as_str(), "Description", &group.description)?;
        unique("security group", &group.name, &mut groups)?;
    }

    for group in &datacenter.firewall_groups {
        for rule in &group.rules {
            require(group.name.as_str(), "Protocol", rule.protocol())?;
            match rule {
                RuleSpec::Cidr(r) => require(group.name.as_str(), "Cidr", &r.cidr)?,
                RuleSpec::Group(r) => {
                    if !groups.contains(&r.group_name) {
                        return Err(ModelError::DanglingReference {
                            owner: format!("security group '{}'", group.name),
                            kind: "security group",
                            name: r.group_name.to_string(),
                        });
                    }
                }
            }
        }
    }

    let mut instances = HashSet::new();
    for instance in &datacenter.instances {
        check_name("Instance", &instance.name, &instance.tags)?;
        let section = instance.name.as_str();
        require(section, "PrivateIp", &instance.private_ip)?;
        require(section, "ParentImage", &instance.parent_image)?;
        require(section, "UserName", &instance.user_name)?;
        require(section, "UserPassword", &instance.user_password)?;
        require(section, "HostName", &instance.host_name)?;
        unique("instance", &instance.name, &mut instances)?;

        if !subnets.contains(&instance.subnet) {
            return Err(ModelError::DanglingReference {
                owner: format!("instance '{}'", instance.name),
                kind: "subnet",
                name: instance.subnet.to_string(),
            });
        }
        if !groups.contains(&instance.firewall_group) {
            return Err(ModelError::DanglingReference {
                owner: format!("instance '{}'", instance.name),
                kind: "security group",
                name: instance.firewall_group.to_string(),
            });
        }
        if let Some(network) = &instance.network
            && network != &datacenter.network.name
        {
            return Err(ModelError::DanglingReference {
                owner: format!("instance '{}'", instance.name),
                kind: "VPC",
                name: network.to_string(),
            });
        }
        if instance.volume_size.is_some_and(|size| size <= 0) {
            return Err(ModelError::InvalidConfig(format!(
                "instance '{}': VolumeSize must be positive",
                instance.name
            )));
        }
    }

    Ok(())
}

fn check_name(section: &str, name: &LogicalName, tags: &Tags) -> Result<()> {
    if name.is_blank() {
        return Err(ModelError::MissingField {
            section: section.to_string(),
            field: "Name",
        });
    }
    if let Some(tagged) = tags.name()
        && tagged != name.as_str()
    {
        return Err(ModelError::InvalidConfig(format!(
            "{} '{}' carries a conflicting Name tag '{}'",
            section, name, tagged
        )));
    }
    Ok(())
}

fn require(section: &str, field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ModelError::MissingField {
            section: section.to_string(),
            field,
        });
    }
    Ok(())
}

fn unique(kind: &'static str, name: &LogicalName, seen: &mut HashSet<LogicalName>) -> Result<()> {
    if !seen.insert(name.clone()) {
        return Err(ModelError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

//! Compute instance specs

use super::tag::{LogicalName, Tags};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";
pub const DEFAULT_VOLUME_SIZE_GIB: i32 = 10;
pub const DEFAULT_DEVICE: &str = "/dev/sda1";
pub const DEFAULT_TENANCY: &str = "default";

/// A compute instance and everything it needs from the rest of the
/// datacenter.
///
/// `network`, `credential` and the sizing fields are optional in the file;
/// [`crate::loader`] fills them in at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceSpec {
    pub name: LogicalName,
    pub private_ip: String,
    #[serde(rename = "ParentImage")]
    pub parent_image: String,
    #[serde(rename = "SecurityGroup", alias = "FirewallGroup")]
    pub firewall_group: LogicalName,
    pub subnet: LogicalName,
    #[serde(rename = "Vpc", alias = "Network", default)]
    pub network: Option<LogicalName>,
    pub user_name: String,
    pub user_password: String,
    pub host_name: String,
    #[serde(rename = "KeyPair", alias = "Credential", default)]
    pub credential: Option<LogicalName>,
    #[serde(rename = "DnsDomain", default)]
    pub dns: Option<InstanceDnsSpec>,
    #[serde(default)]
    pub target_image: Option<LogicalName>,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub volume_size: Option<i32>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub tenancy: Option<String>,
    #[serde(default)]
    pub tags: Tags,
}

impl InstanceSpec {
    /// Name of the key pair used for first access; the instance name
    /// unless declared otherwise.
    pub fn credential_name(&self) -> &LogicalName {
        self.credential.as_ref().unwrap_or(&self.name)
    }

    pub fn instance_type(&self) -> &str {
        self.instance_type.as_deref().unwrap_or(DEFAULT_INSTANCE_TYPE)
    }

    pub fn volume_size(&self) -> i32 {
        self.volume_size.unwrap_or(DEFAULT_VOLUME_SIZE_GIB)
    }

    pub fn device(&self) -> &str {
        self.device.as_deref().unwrap_or(DEFAULT_DEVICE)
    }

    pub fn tenancy(&self) -> &str {
        self.tenancy.as_deref().unwrap_or(DEFAULT_TENANCY)
    }

    /// Fully qualified DNS name, if the instance is published in DNS
    pub fn fqdn(&self) -> Option<&str> {
        self.dns.as_ref().map(|d| d.fqdn.as_str())
    }
}

/// DNS name an instance is published under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceDnsSpec {
    pub fqdn: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANCE: &str = r#"{
        "Name": "admin-box",
        "PrivateIp": "10.0.20.10",
        "ParentImage": "ami-base",
        "SecurityGroup": "admin-sgp",
        "Subnet": "admin-subnet",
        "UserName": "awsadmin",
        "UserPassword": "awsadmin",
        "HostName": "admin.maxmin.it",
        "DnsDomain": "admin.maxmin.it",
        "Tags": [{"Key": "class", "Value": "admin"}]
    }"#;

    #[test]
    fn test_optional_fields_fall_back_to_defaults() {
        let spec: InstanceSpec = serde_json::from_str(INSTANCE).unwrap();

        assert_eq!(spec.credential_name(), "admin-box");
        assert_eq!(spec.instance_type(), "t2.micro");
        assert_eq!(spec.volume_size(), 10);
        assert_eq!(spec.device(), "/dev/sda1");
        assert_eq!(spec.tenancy(), "default");
        assert!(spec.network.is_none());
        assert!(spec.target_image.is_none());
    }

    #[test]
    fn test_dns_domain_is_the_record_name() {
        let spec: InstanceSpec = serde_json::from_str(INSTANCE).unwrap();
        assert_eq!(spec.fqdn(), Some("admin.maxmin.it"));
    }

    #[test]
    fn test_declared_key_pair_overrides_instance_name() {
        let mut spec: InstanceSpec = serde_json::from_str(INSTANCE).unwrap();
        spec.credential = Some(LogicalName::from("shared-key"));
        assert_eq!(spec.credential_name(), "shared-key");
    }
}

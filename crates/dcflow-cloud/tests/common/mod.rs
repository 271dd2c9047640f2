use dcflow_cloud::memory::Operation;
use dcflow_cloud::{CredentialStore, Engine, MemoryProvider};
use dcflow_core::{BootTemplate, Datacenter, HostedZoneSpec, parse_datacenter, parse_hosted_zone};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Network N, subnet S and group G with a single ssh rule
pub const MINIMAL: &str = r#"{
  "Datacenter": {
    "VPC": {"Name": "N", "Cidr": "10.0.0.0/16"},
    "InternetGateway": {"Name": "gw"},
    "RouteTable": {"Name": "rtb"},
    "Subnets": [{"Name": "S", "Az": "A", "Cidr": "10.0.0.0/24"}],
    "SecurityGroups": [
      {
        "Name": "G",
        "Description": "ssh access",
        "Rules": [
          {"FromPort": 22, "ToPort": 22, "Protocol": "tcp", "Cidr": "0.0.0.0/0"}
        ]
      }
    ]
  }
}"#;

/// Two groups referencing each other, one instance published in DNS
pub const FULL: &str = r#"{
  "Datacenter": {
    "VPC": {
      "Name": "N",
      "Cidr": "10.0.0.0/16",
      "Tags": [{"Key": "class", "Value": "webservices"}]
    },
    "InternetGateway": {"Name": "gw"},
    "RouteTable": {"Name": "rtb"},
    "Subnets": [
      {"Name": "S", "Az": "eu-west-1a", "Cidr": "10.0.0.0/24"},
      {"Name": "T", "Az": "eu-west-1b", "Cidr": "10.0.1.0/24"}
    ],
    "SecurityGroups": [
      {
        "Name": "G",
        "Description": "admin access",
        "Rules": [
          {"FromPort": 22, "ToPort": 22, "Protocol": "tcp", "Cidr": "0.0.0.0/0"},
          {"FromPort": 80, "ToPort": 90, "Protocol": "tcp", "Cidr": "10.0.0.0/24"},
          {"FromPort": 8080, "ToPort": 8080, "Protocol": "tcp", "SgpName": "H"}
        ]
      },
      {
        "Name": "H",
        "Description": "web access",
        "Rules": [
          {"FromPort": 443, "ToPort": 443, "Protocol": "tcp", "SgpName": "G"}
        ]
      }
    ],
    "Instances": [
      {
        "Name": "admin-box",
        "PrivateIp": "10.0.0.10",
        "ParentImage": "base-image",
        "SecurityGroup": "G",
        "Subnet": "S",
        "UserName": "admin",
        "UserPassword": "secret",
        "HostName": "admin.maxmin.it",
        "DnsDomain": "admin.maxmin.it",
        "TargetImage": "admin-image",
        "Tags": [{"Key": "class", "Value": "admin"}]
      }
    ]
  }
}"#;

pub const HOSTED_ZONE: &str = r#"{"HostedZone": {"RegisteredDomain": "maxmin.it"}}"#;

pub const NO_HOSTED_ZONE: &str = r#"{"HostedZone": {}}"#;

/// An engine over a fresh in-memory provider and a temporary access dir
pub struct TestDatacenter {
    pub provider: Arc<MemoryProvider>,
    pub engine: Engine,
    pub datacenter: Datacenter,
    pub hosted_zone: HostedZoneSpec,
    pub access: TempDir,
}

impl TestDatacenter {
    pub fn new(datacenter: &str, hosted_zone: &str) -> Self {
        Self::with_provider(MemoryProvider::new(), datacenter, hosted_zone)
    }

    pub fn with_provider(provider: MemoryProvider, datacenter: &str, hosted_zone: &str) -> Self {
        let provider = Arc::new(provider);
        let access = tempfile::tempdir().unwrap();
        let engine = Engine::new(
            provider.clone(),
            CredentialStore::new(access.path()),
            BootTemplate::builtin(),
        );
        let path = PathBuf::from("datacenter.json");
        Self {
            provider,
            engine,
            datacenter: parse_datacenter(datacenter, &path).unwrap(),
            hosted_zone: parse_hosted_zone(hosted_zone, &path).unwrap(),
            access,
        }
    }

    #[allow(dead_code)]
    pub fn key_file(&self, name: &str) -> PathBuf {
        self.access.path().join(name)
    }

    #[allow(dead_code)]
    pub fn access_dir(&self) -> &Path {
        self.access.path()
    }

    /// Calls of `operation` on any resource kind
    #[allow(dead_code)]
    pub fn calls_of(&self, operation: Operation) -> usize {
        self.provider
            .calls()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }
}

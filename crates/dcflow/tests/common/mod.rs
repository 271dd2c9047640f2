use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const DATACENTER: &str = r#"{
  "Datacenter": {
    "VPC": {"Name": "N", "Cidr": "10.0.0.0/16"},
    "InternetGateway": {"Name": "gw"},
    "RouteTable": {"Name": "rtb"},
    "Subnets": [{"Name": "S", "Az": "eu-west-1a", "Cidr": "10.0.0.0/24"}],
    "SecurityGroups": [
      {
        "Name": "G",
        "Description": "ssh access",
        "Rules": [
          {"FromPort": 22, "ToPort": 22, "Protocol": "tcp", "Cidr": "0.0.0.0/0"}
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
        "HostName": "admin",
        "DnsDomain": "admin.maxmin.it"
      }
    ]
  }
}"#;

pub const DANGLING_GROUP: &str = r#"{
  "Datacenter": {
    "VPC": {"Name": "N", "Cidr": "10.0.0.0/16"},
    "InternetGateway": {"Name": "gw"},
    "RouteTable": {"Name": "rtb"},
    "SecurityGroups": [
      {
        "Name": "G",
        "Description": "web access",
        "Rules": [
          {"FromPort": 443, "ToPort": 443, "Protocol": "tcp", "SgpName": "X"}
        ]
      }
    ]
  }
}"#;

pub const HOSTED_ZONE: &str = r#"{"HostedZone": {"RegisteredDomain": "maxmin.it"}}"#;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Datacenter and hosted zone files, in argument order
    pub fn configs(&self, datacenter: &str) -> (PathBuf, PathBuf) {
        (
            self.write("datacenter.json", datacenter),
            self.write("hosted_zone.json", HOSTED_ZONE),
        )
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}

#![allow(deprecated)] // TODO: move from Command::cargo_bin to the cargo_bin_cmd! macro

mod common;

use assert_cmd::Command;
use common::{DANGLING_GROUP, DATACENTER, TestProject};
use predicates::prelude::*;

const CREDENTIAL_VARS: [&str; 4] = [
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
    "AWS_DEFAULT_REGION",
];

fn dcflow() -> Command {
    let mut cmd = Command::cargo_bin("dcflow").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Help lists every subcommand
#[test]
fn test_cli_help() {
    dcflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("provision"))
        .stdout(predicate::str::contains("decommission"))
        .stdout(predicate::str::contains("capture-images"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_cli_version() {
    dcflow()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dcflow"));
}

/// Both configuration paths are positional and required
#[test]
fn test_provision_requires_both_paths() {
    dcflow()
        .arg("provision")
        .arg("datacenter.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<HOSTED_ZONE>"));
}

#[test]
fn test_invalid_command() {
    dcflow().arg("invalid-command").assert().failure();
}

/// validate needs neither credentials nor the network
#[test]
fn test_validate_valid_configuration() {
    let project = TestProject::new();
    let (datacenter, hosted_zone) = project.configs(DATACENTER);

    let mut cmd = dcflow();
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("validate")
        .arg(&datacenter)
        .arg(&hosted_zone)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("VPC: N (10.0.0.0/16)"))
        .stdout(predicate::str::contains("admin.maxmin.it"))
        .stdout(predicate::str::contains("Hosted zone: maxmin.it"));
}

#[test]
fn test_validate_rejects_dangling_group_reference() {
    let project = TestProject::new();
    let (datacenter, hosted_zone) = project.configs(DANGLING_GROUP);

    dcflow()
        .arg("validate")
        .arg(&datacenter)
        .arg(&hosted_zone)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "security group 'G' references undeclared security group 'X'",
        ));
}

/// A missing configuration file is reported before credentials are read
#[test]
fn test_provision_with_missing_config() {
    let project = TestProject::new();
    let hosted_zone = project.write("hosted_zone.json", common::HOSTED_ZONE);

    let mut cmd = dcflow();
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("provision")
        .arg(project.path().join("missing.json"))
        .arg(&hosted_zone)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading configuration file"));
}

/// Missing credentials are fatal before any remote call
#[test]
fn test_provision_without_credentials() {
    let project = TestProject::new();
    let (datacenter, hosted_zone) = project.configs(DATACENTER);

    let mut cmd = dcflow();
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.env("DATACENTER_DIR", project.path())
        .arg("provision")
        .arg(&datacenter)
        .arg(&hosted_zone)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "environment variable AWS_ACCESS_KEY_ID not set!",
        ));

    assert!(!project.path().join("access").exists());
}

#[test]
fn test_decommission_without_region() {
    let project = TestProject::new();
    let (datacenter, hosted_zone) = project.configs(DATACENTER);

    dcflow()
        .env("AWS_ACCESS_KEY_ID", "AKIA")
        .env("AWS_SECRET_ACCESS_KEY", "secret")
        .env_remove("AWS_DEFAULT_REGION")
        .env("DATACENTER_DIR", project.path())
        .arg("decommission")
        .arg(&datacenter)
        .arg(&hosted_zone)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "environment variable AWS_DEFAULT_REGION not set!",
        ));
}

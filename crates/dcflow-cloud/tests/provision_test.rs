mod common;

use common::{FULL, HOSTED_ZONE, MINIMAL, NO_HOSTED_ZONE, TestDatacenter};
use dcflow_cloud::accessors::{NetworkAccessor, NetworkRequest};
use dcflow_cloud::memory::Operation;
use dcflow_cloud::{
    CloudError, ErrorKind, MemoryProvider, NewResource, Provider, ProviderError, ResourceKind,
    StepOutcome, ensure_created,
};
use dcflow_core::{LogicalName, Tags};

const CREATABLE: [ResourceKind; 7] = [
    ResourceKind::Network,
    ResourceKind::Gateway,
    ResourceKind::RouteTable,
    ResourceKind::Subnet,
    ResourceKind::FirewallGroup,
    ResourceKind::KeyPair,
    ResourceKind::Instance,
];

/// ensure_created twice yields one resource and a single create call
#[tokio::test]
async fn test_ensure_created_is_idempotent() {
    let dc = TestDatacenter::new(MINIMAL, NO_HOSTED_ZONE);
    let accessor = NetworkAccessor::new(dc.provider.clone());
    let name = LogicalName::new("N");
    let request = NetworkRequest {
        cidr: "10.0.0.0/16".into(),
        tags: Tags::new(),
    };

    let first = ensure_created(&accessor, &name, &request).await.unwrap();
    let second = ensure_created(&accessor, &name, &request).await.unwrap();

    assert!(first.was_created());
    assert!(!second.was_created());
    assert_eq!(first.get().id, second.get().id);
    assert_eq!(dc.provider.count(Operation::Create, ResourceKind::Network), 1);
    assert_eq!(dc.provider.resources_named(ResourceKind::Network, "N"), 1);
}

/// N, S and G with one ssh rule, all tagged with their names
#[tokio::test]
async fn test_first_run_creates_minimal_datacenter() {
    let dc = TestDatacenter::new(MINIMAL, NO_HOSTED_ZONE);

    let outcome = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();

    for (kind, name) in [
        (ResourceKind::Network, "N"),
        (ResourceKind::Gateway, "gw"),
        (ResourceKind::RouteTable, "rtb"),
        (ResourceKind::Subnet, "S"),
        (ResourceKind::FirewallGroup, "G"),
    ] {
        assert_eq!(dc.provider.resources_named(kind, name), 1, "{kind} {name}");
        assert_eq!(outcome.report.outcome_of(kind, name), Some(StepOutcome::Created));
    }

    let rules = dc.provider.rules_of("G");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].from_port, 22);
    assert_eq!(rules[0].protocol, "tcp");

    let subnet_steps = outcome.report.steps_for(ResourceKind::Subnet);
    assert_eq!(subnet_steps.len(), 2);
    assert_eq!(subnet_steps[1].outcome, StepOutcome::Associated);
    assert_eq!(
        outcome.report.outcome_of(ResourceKind::Gateway, "gw"),
        Some(StepOutcome::Created)
    );
    assert_eq!(outcome.report.count(StepOutcome::Attached), 1);
    assert_eq!(outcome.report.count(StepOutcome::RouteAdded), 1);
    assert!(outcome.inventory.is_empty());
}

/// Identical config on the second run: no creates, same ids
#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let dc = TestDatacenter::new(MINIMAL, NO_HOSTED_ZONE);
    dc.engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();
    let network_id = dc
        .provider
        .describe_networks(&LogicalName::new("N"))
        .await
        .unwrap()[0]
        .id
        .clone();
    dc.provider.clear_calls();

    let outcome = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();

    for kind in CREATABLE {
        assert_eq!(dc.provider.count(Operation::Create, kind), 0, "{kind}");
    }
    for operation in [
        Operation::Attach,
        Operation::Associate,
        Operation::CreateRoute,
        Operation::Authorize,
    ] {
        assert_eq!(
            dc.calls_of(operation),
            0,
            "{operation:?} issued on an unchanged datacenter"
        );
    }
    assert!(!outcome.report.has_changes());
    assert_eq!(dc.provider.rules_of("G").len(), 1);

    let again = dc
        .provider
        .describe_networks(&LogicalName::new("N"))
        .await
        .unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].id, network_id);
}

/// A CIDR rule is matched structurally, not by tag
#[tokio::test]
async fn test_rule_is_created_once() {
    let dc = TestDatacenter::new(MINIMAL, NO_HOSTED_ZONE);
    let rule = "G: tcp 22-22 from 0.0.0.0/0";

    let first = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();
    let second = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();

    assert_eq!(
        first.report.outcome_of(ResourceKind::FirewallRule, rule),
        Some(StepOutcome::Created)
    );
    assert_eq!(
        second.report.outcome_of(ResourceKind::FirewallRule, rule),
        Some(StepOutcome::Unchanged)
    );
    assert_eq!(dc.provider.rules_of("G").len(), 1);
}

/// Two live networks named N: the pass aborts before any mutation
#[tokio::test]
async fn test_duplicate_names_are_ambiguous() {
    let dc = TestDatacenter::new(MINIMAL, NO_HOSTED_ZONE);
    let network = NewResource::Network {
        cidr: "10.0.0.0/16".into(),
    };
    let tags = Tags::new().with_identity(&LogicalName::new("N"));
    dc.provider.create(&network, &tags).await.unwrap();
    dc.provider.create(&network, &tags).await.unwrap();
    dc.provider.clear_calls();

    let err = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Ambiguity);
    assert!(matches!(
        err,
        CloudError::Ambiguous {
            kind: ResourceKind::Network,
            count: 2,
            ..
        }
    ));
    assert!(dc
        .provider
        .calls()
        .iter()
        .all(|c| c.operation == Operation::Describe));
}

/// Dependents are only created once their parents are resolved
#[tokio::test]
async fn test_dependency_ordering() {
    let dc = TestDatacenter::new(FULL, HOSTED_ZONE);
    dc.provider.seed_image("base-image");
    dc.provider.seed_hosted_zone("maxmin.it");

    dc.engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();

    let created = |kind| dc.provider.first_call(Operation::Create, kind).unwrap();
    let last_created = |kind| dc.provider.last_call(Operation::Create, kind).unwrap();

    assert!(created(ResourceKind::Network) < created(ResourceKind::Subnet));
    assert!(created(ResourceKind::Network) < created(ResourceKind::RouteTable));
    assert!(created(ResourceKind::Network) < created(ResourceKind::FirewallGroup));
    assert!(last_created(ResourceKind::Subnet) < created(ResourceKind::Instance));
    assert!(last_created(ResourceKind::FirewallGroup) < created(ResourceKind::Instance));
    assert!(last_created(ResourceKind::KeyPair) < created(ResourceKind::Instance));

    // a group rule needs both groups
    let first_rule = dc
        .provider
        .first_call(Operation::Authorize, ResourceKind::FirewallRule)
        .unwrap();
    assert!(last_created(ResourceKind::FirewallGroup) < first_rule);
}

/// Instance, key file, DNS record and inventory for the full datacenter
#[tokio::test]
async fn test_full_datacenter() {
    let dc = TestDatacenter::new(FULL, HOSTED_ZONE);
    let parent = dc.provider.seed_image("base-image");
    let zone = dc.provider.seed_hosted_zone("maxmin.it");

    let outcome = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();

    let instance = dc.provider.instance_named("admin-box").unwrap();
    assert_eq!(instance.image_id.as_ref(), Some(&parent));
    assert_eq!(instance.private_ip.as_deref(), Some("10.0.0.10"));
    assert_eq!(instance.key_name.as_deref(), Some("admin-box"));
    assert_eq!(instance.firewall_group_ids.len(), 1);
    assert_eq!(instance.tags.name(), Some("admin-box"));
    assert_eq!(instance.tags.get("class"), Some("admin"));

    assert_eq!(dc.provider.rules_of("G").len(), 3);
    assert_eq!(dc.provider.rules_of("H").len(), 1);

    let key_file = dc.key_file("admin-box");
    assert!(std::fs::read_to_string(&key_file)
        .unwrap()
        .contains("PRIVATE KEY"));
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&key_file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o400);
    }

    let records = dc.provider.records_in(&zone);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, "A");
    assert_eq!(records[0].ttl, 300);
    assert_eq!(Some(&records[0].values[0]), instance.public_ip.as_ref());

    assert_eq!(outcome.inventory.len(), 1);
    assert_eq!(outcome.inventory[0].name, "admin-box");
    assert_eq!(outcome.inventory[0].public_ip, instance.public_ip);
    assert_eq!(
        outcome.inventory[0].dns_name.as_deref(),
        Some("admin.maxmin.it")
    );
}

/// A rerun leaves the key pair, the instance and the record alone
#[tokio::test]
async fn test_full_datacenter_rerun() {
    let dc = TestDatacenter::new(FULL, HOSTED_ZONE);
    dc.provider.seed_image("base-image");
    let zone = dc.provider.seed_hosted_zone("maxmin.it");
    dc.engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();
    dc.provider.clear_calls();

    let outcome = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();

    assert_eq!(dc.calls_of(Operation::Create), 0);
    assert_eq!(dc.calls_of(Operation::ChangeRecord), 0);
    assert_eq!(
        outcome
            .report
            .outcome_of(ResourceKind::DnsRecord, "admin.maxmin.it"),
        Some(StepOutcome::Unchanged)
    );
    assert_eq!(dc.provider.records_in(&zone).len(), 1);
    assert_eq!(dc.provider.resources_named(ResourceKind::Instance, "admin-box"), 1);
}

/// A missing parent image fails the pass before the instance is launched
#[tokio::test]
async fn test_missing_parent_image_is_unresolved() {
    let dc = TestDatacenter::new(FULL, HOSTED_ZONE);

    let err = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "image 'base-image' not found!");
    assert_eq!(dc.provider.count(Operation::Create, ResourceKind::Instance), 0);
    assert_eq!(dc.provider.resources_named(ResourceKind::Network, "N"), 1);
}

/// A timed out wait is fatal: nothing that depends on the resource is created
#[tokio::test]
async fn test_wait_timeout_aborts_the_pass() {
    let dc = TestDatacenter::new(MINIMAL, NO_HOSTED_ZONE);
    dc.provider.fail_on(
        Operation::Wait,
        ResourceKind::Network,
        ProviderError::timeout("Timed out waiting for the VPC after 40 attempts"),
    );

    let err = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(err.to_string(), "Error waiting for the VPC to become available!");
    for kind in [
        ResourceKind::Gateway,
        ResourceKind::RouteTable,
        ResourceKind::Subnet,
        ResourceKind::FirewallGroup,
    ] {
        assert_eq!(dc.provider.count(Operation::Create, kind), 0, "{kind}");
    }
    assert_eq!(dc.calls_of(Operation::Wait), 1);

    // the network exists; a rerun finds it instead of creating another
    dc.provider.clear_failures();
    let outcome = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();

    assert_eq!(
        outcome.report.outcome_of(ResourceKind::Network, "N"),
        Some(StepOutcome::Unchanged)
    );
    assert_eq!(dc.provider.count(Operation::Create, ResourceKind::Network), 1);
    assert_eq!(dc.provider.resources_named(ResourceKind::Subnet, "S"), 1);
}

/// Provider failures abort the pass with a fixed message
#[tokio::test]
async fn test_provider_failure_aborts_the_pass() {
    let dc = TestDatacenter::new(MINIMAL, NO_HOSTED_ZONE);
    dc.provider.fail_on(
        Operation::Create,
        ResourceKind::Subnet,
        ProviderError::other("SubnetLimitExceeded").with_code("SubnetLimitExceeded"),
    );

    let err = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(err.to_string(), "Error creating the subnet!");
    assert_eq!(
        dc.provider.count(Operation::Create, ResourceKind::FirewallGroup),
        0
    );

    // a rerun picks up where the first one stopped
    dc.provider.clear_failures();
    dc.provider.clear_calls();
    let outcome = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();
    assert_eq!(dc.provider.count(Operation::Create, ResourceKind::Network), 0);
    assert_eq!(
        outcome.report.outcome_of(ResourceKind::Subnet, "S"),
        Some(StepOutcome::Created)
    );
    assert_eq!(dc.provider.resources_named(ResourceKind::Network, "N"), 1);
}

/// An existing private key file is never overwritten
#[tokio::test]
async fn test_existing_key_file_blocks_key_pair() {
    let dc = TestDatacenter::new(FULL, HOSTED_ZONE);
    dc.provider.seed_image("base-image");
    std::fs::write(dc.key_file("admin-box"), "old key").unwrap();

    let err = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::Credential { .. }));
    assert_eq!(dc.provider.count(Operation::Create, ResourceKind::KeyPair), 0);
    assert_eq!(
        std::fs::read_to_string(dc.key_file("admin-box")).unwrap(),
        "old key"
    );
}

/// No hosted zone or no public address only skips the DNS step
#[tokio::test]
async fn test_dns_steps_are_skipped_softly() {
    let dc = TestDatacenter::new(FULL, HOSTED_ZONE);
    dc.provider.seed_image("base-image");

    let outcome = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();
    let steps = outcome.report.steps_for(ResourceKind::DnsRecord);
    let step = steps[0];
    assert_eq!(step.outcome, StepOutcome::Skipped);
    assert_eq!(step.detail.as_deref(), Some("hosted zone not available"));
    assert_eq!(outcome.inventory[0].dns_name, None);

    let dc = TestDatacenter::with_provider(
        MemoryProvider::without_public_addresses(),
        FULL,
        HOSTED_ZONE,
    );
    dc.provider.seed_image("base-image");
    let zone = dc.provider.seed_hosted_zone("maxmin.it");

    let outcome = dc
        .engine
        .provision(&dc.datacenter, &dc.hosted_zone)
        .await
        .unwrap();
    assert_eq!(
        outcome
            .report
            .outcome_of(ResourceKind::DnsRecord, "admin.maxmin.it"),
        Some(StepOutcome::Skipped)
    );
    assert!(dc.provider.records_in(&zone).is_empty());
    assert_eq!(outcome.inventory[0].public_ip, None);
}

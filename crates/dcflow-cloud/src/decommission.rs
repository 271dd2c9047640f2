//! Reverse pass: tear the datacenter down, dependents first
//!
//! Absent resources are success, so a teardown interrupted half way can be
//! run again. The network always goes last.

use crate::engine::{Engine, log_abort, record_removed};
use crate::error::Result;
use crate::lookup::{Accessor, ensure_deleted};
use crate::remote::{ResourceId, ResourceKind};
use crate::report::{Report, StepOutcome};
use dcflow_core::{Datacenter, HostedZoneSpec, LogicalName};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

impl Engine {
    /// Delete every declared resource that still exists
    #[instrument(skip_all, fields(network = %datacenter.network.name))]
    pub async fn decommission(
        &self,
        datacenter: &Datacenter,
        hosted_zone: &HostedZoneSpec,
    ) -> Result<Report> {
        info!("Deleting datacenter ...");
        let mut report = Report::new();
        log_abort(
            "decommission",
            self.run_decommission(datacenter, hosted_zone, &mut report)
                .await,
        )?;
        report.finish();
        info!(summary = %report.summary(), "Datacenter deleted");
        Ok(report)
    }

    async fn run_decommission(
        &self,
        dc: &Datacenter,
        hosted_zone: &HostedZoneSpec,
        report: &mut Report,
    ) -> Result<()> {
        self.withdraw_records(dc, hosted_zone, report).await?;

        // instances, then their key pairs and captured images
        for spec in &dc.instances {
            let removed = ensure_deleted(&self.instances, &spec.name).await?;
            record_removed(report, ResourceKind::Instance, &spec.name, &removed);

            let key_name = spec.credential_name();
            let removed = ensure_deleted(&self.key_pairs, key_name).await?;
            if removed.is_none() && self.credentials().remove(key_name.as_str()).await? {
                warn!(key = %key_name, "Removed private key file of a missing key pair");
            }
            record_removed(report, ResourceKind::KeyPair, key_name, &removed);

            if let Some(image) = &spec.target_image {
                let removed = ensure_deleted(&self.images, image).await?;
                record_removed(report, ResourceKind::Image, image, &removed);
            }
        }

        // rules before groups: a group referenced by another group's rule
        // cannot be deleted
        let mut group_ids: HashMap<LogicalName, ResourceId> = HashMap::new();
        for spec in &dc.firewall_groups {
            if let Some(group) = self.firewall_groups.find(&spec.name).await? {
                group_ids.insert(spec.name.clone(), group.id);
            }
        }
        for spec in &dc.firewall_groups {
            let Some(group_id) = group_ids.get(&spec.name) else {
                continue;
            };
            for rule in &spec.rules {
                let name = |key: &dyn std::fmt::Display| format!("{}: {}", spec.name, key);
                let Ok(key) = self.rule_key(rule, &group_ids) else {
                    // the referenced group is gone, and the rule with it
                    report.record(
                        ResourceKind::FirewallRule,
                        name(&rule.protocol()),
                        StepOutcome::Absent,
                    );
                    continue;
                };
                let outcome = if self.rules.ensure_deleted(group_id, &key).await? {
                    StepOutcome::Deleted
                } else {
                    StepOutcome::Absent
                };
                report.record(ResourceKind::FirewallRule, name(&key), outcome);
            }
        }
        for spec in &dc.firewall_groups {
            let removed = ensure_deleted(&self.firewall_groups, &spec.name).await?;
            record_removed(report, ResourceKind::FirewallGroup, &spec.name, &removed);
        }

        // detached by the gateway accessor before deletion
        let removed = ensure_deleted(&self.gateways, &dc.gateway.name).await?;
        record_removed(report, ResourceKind::Gateway, &dc.gateway.name, &removed);

        for spec in &dc.subnets {
            let removed = ensure_deleted(&self.subnets, &spec.name).await?;
            record_removed(report, ResourceKind::Subnet, &spec.name, &removed);
        }

        let removed = ensure_deleted(&self.route_tables, &dc.route_table.name).await?;
        record_removed(report, ResourceKind::RouteTable, &dc.route_table.name, &removed);

        let removed = ensure_deleted(&self.networks, &dc.network.name).await?;
        record_removed(report, ResourceKind::Network, &dc.network.name, &removed);

        Ok(())
    }
}

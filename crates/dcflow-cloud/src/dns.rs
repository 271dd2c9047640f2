//! DNS reconciliation
//!
//! A loosely coupled graph keyed off instance public addresses. A missing
//! hosted zone or a missing address is never fatal; the step is skipped
//! with a warning.

use crate::engine::Engine;
use crate::error::Result;
use crate::lookup::Accessor;
use crate::remote::{HostedZone, ResourceKind};
use crate::report::{InstanceInventory, Report, StepOutcome};
use dcflow_core::{Datacenter, HostedZoneSpec};
use tracing::warn;

impl Engine {
    async fn resolve_zone(&self, hosted_zone: &HostedZoneSpec) -> Result<Option<HostedZone>> {
        let Some(domain) = hosted_zone
            .registered_domain
            .as_deref()
            .filter(|_| hosted_zone.is_enabled())
        else {
            return Ok(None);
        };

        let zone = self.dns.find_zone(domain).await?;
        if zone.is_none() {
            warn!(domain, "Hosted zone not found!");
        }
        Ok(zone)
    }

    /// Create missing `A` records for instances declaring a DNS name
    pub(crate) async fn publish_records(
        &self,
        dc: &Datacenter,
        hosted_zone: &HostedZoneSpec,
        report: &mut Report,
    ) -> Result<Vec<InstanceInventory>> {
        let zone = self.resolve_zone(hosted_zone).await?;
        let mut inventory = Vec::with_capacity(dc.instances.len());

        for spec in &dc.instances {
            let public_ip = self
                .instances
                .find(&spec.name)
                .await?
                .and_then(|i| i.public_ip);

            let dns_name = match (spec.fqdn(), &zone) {
                (None, _) => None,
                (Some(fqdn), None) => {
                    report.record_with(
                        ResourceKind::DnsRecord,
                        fqdn,
                        StepOutcome::Skipped,
                        "hosted zone not available",
                    );
                    None
                }
                (Some(fqdn), Some(zone)) => {
                    if self.dns.find_record(zone, fqdn).await?.is_some() {
                        warn!(fqdn, "DNS record already exists");
                        report.record(ResourceKind::DnsRecord, fqdn, StepOutcome::Unchanged);
                        Some(fqdn.to_string())
                    } else if let Some(address) = &public_ip {
                        self.dns.create_record(zone, fqdn, address).await?;
                        report.record(ResourceKind::DnsRecord, fqdn, StepOutcome::Created);
                        Some(fqdn.to_string())
                    } else {
                        warn!(fqdn, instance = %spec.name, "Instance has no public address, DNS record skipped");
                        report.record_with(
                            ResourceKind::DnsRecord,
                            fqdn,
                            StepOutcome::Skipped,
                            "instance has no public address",
                        );
                        None
                    }
                }
            };

            inventory.push(InstanceInventory {
                name: spec.name.to_string(),
                public_ip,
                dns_name,
            });
        }

        Ok(inventory)
    }

    /// Delete the `A` records of the live instances declaring a DNS name
    ///
    /// A record whose instance is already gone is left in place.
    pub(crate) async fn withdraw_records(
        &self,
        dc: &Datacenter,
        hosted_zone: &HostedZoneSpec,
        report: &mut Report,
    ) -> Result<()> {
        let Some(zone) = self.resolve_zone(hosted_zone).await? else {
            return Ok(());
        };

        for spec in &dc.instances {
            let Some(fqdn) = spec.fqdn() else {
                continue;
            };
            if self.instances.find(&spec.name).await?.is_none() {
                warn!(fqdn, instance = %spec.name, "Instance not found, DNS record skipped");
                report.record_with(
                    ResourceKind::DnsRecord,
                    fqdn,
                    StepOutcome::Skipped,
                    format!("instance {} not found", spec.name),
                );
                continue;
            }

            match self.dns.find_record(&zone, fqdn).await? {
                Some(record) => {
                    self.dns.delete_record(&zone, &record).await?;
                    report.record(ResourceKind::DnsRecord, fqdn, StepOutcome::Deleted);
                }
                None => {
                    warn!(fqdn, "DNS record already deleted");
                    report.record(ResourceKind::DnsRecord, fqdn, StepOutcome::Absent);
                }
            }
        }
        Ok(())
    }
}

//! Hosted zones and `A` records
//!
//! Zones are never created here; they are registered outside the engine.
//! Records are keyed by their fully qualified name, not by tags.

use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::provider::{ChangeAction, Provider, RecordChange};
use crate::remote::{DnsRecord, HostedZone, ResourceKind, TerminalState, dns_name_eq};
use std::sync::Arc;
use tracing::info;

/// TTL of the records the engine creates
pub const DNS_RECORD_TTL: i64 = 300;

pub struct DnsAccessor {
    provider: Arc<dyn Provider>,
}

impl DnsAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn find_zone(&self, domain: &str) -> Result<Option<HostedZone>> {
        let zones = self
            .provider
            .list_hosted_zones()
            .await
            .or_fail("Error loading the hosted zone!")?;
        let matching = zones.into_iter().filter(|z| z.matches(domain)).collect();
        resolve_unique(ResourceKind::HostedZone, domain, matching)
    }

    /// The `A` record named `fqdn` in `zone`
    pub async fn find_record(&self, zone: &HostedZone, fqdn: &str) -> Result<Option<DnsRecord>> {
        let records = self
            .provider
            .list_records(&zone.id)
            .await
            .or_fail("Error loading the DNS record!")?;
        let matching = records
            .into_iter()
            .filter(|r| r.record_type == "A" && dns_name_eq(&r.name, fqdn))
            .collect();
        resolve_unique(ResourceKind::DnsRecord, fqdn, matching)
    }

    pub async fn create_record(&self, zone: &HostedZone, fqdn: &str, address: &str) -> Result<()> {
        let change = RecordChange {
            action: ChangeAction::Create,
            record: DnsRecord::a(fqdn, address, DNS_RECORD_TTL),
        };
        self.submit(zone, &change, "Error creating the DNS record!")
            .await?;
        info!(fqdn, address, "DNS record created");
        Ok(())
    }

    /// Delete with the live record's exact values, as the provider requires
    pub async fn delete_record(&self, zone: &HostedZone, record: &DnsRecord) -> Result<()> {
        let change = RecordChange {
            action: ChangeAction::Delete,
            record: record.clone(),
        };
        self.submit(zone, &change, "Error deleting the DNS record!")
            .await?;
        info!(fqdn = %record.name, "DNS record deleted");
        Ok(())
    }

    async fn submit(&self, zone: &HostedZone, change: &RecordChange, message: &str) -> Result<()> {
        let change_id = self
            .provider
            .change_record(&zone.id, change)
            .await
            .or_fail(message)?;
        self.provider
            .wait_until(ResourceKind::DnsRecord, &change_id, TerminalState::InSync)
            .await
            .or_fail(message)
    }
}

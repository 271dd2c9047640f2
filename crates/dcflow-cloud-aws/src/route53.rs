//! Route 53 client

use crate::error::sdk_error;
use aws_sdk_route53::Client;
use aws_sdk_route53::types::{
    self as r53, Change, ChangeBatch, ChangeStatus, ResourceRecord, ResourceRecordSet, RrType,
};
use dcflow_cloud::remote::{DnsRecord, HostedZone};
use dcflow_cloud::{ChangeAction, ProviderError, ProviderResult, RecordChange, ResourceId};
use std::fmt::Display;
use tracing::debug;

pub struct Route53 {
    client: Client,
}

/// Route 53 returns ids as paths (`/hostedzone/Z123`, `/change/C123`)
fn strip_path(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

fn build_error(what: &str, err: impl Display) -> ProviderError {
    ProviderError::other(format!("Invalid {}: {}", what, err))
}

fn record_from(set: &ResourceRecordSet) -> DnsRecord {
    DnsRecord {
        name: set.name().to_string(),
        record_type: set.r#type().as_str().to_string(),
        ttl: set.ttl().unwrap_or_default(),
        values: set
            .resource_records()
            .iter()
            .map(|r| r.value().to_string())
            .collect(),
    }
}

fn change_batch(change: &RecordChange) -> ProviderResult<ChangeBatch> {
    let record = &change.record;
    let mut set = ResourceRecordSet::builder()
        .name(&record.name)
        .r#type(RrType::from(record.record_type.as_str()))
        .ttl(record.ttl);
    for value in &record.values {
        let value = ResourceRecord::builder()
            .value(value)
            .build()
            .map_err(|e| build_error("resource record", e))?;
        set = set.resource_records(value);
    }
    let set = set
        .build()
        .map_err(|e| build_error("record set", e))?;

    let action = match change.action {
        ChangeAction::Create => r53::ChangeAction::Create,
        ChangeAction::Delete => r53::ChangeAction::Delete,
    };
    let change = Change::builder()
        .action(action)
        .resource_record_set(set)
        .build()
        .map_err(|e| build_error("change", e))?;

    ChangeBatch::builder()
        .changes(change)
        .build()
        .map_err(|e| build_error("change batch", e))
}

impl Route53 {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn list_hosted_zones(&self) -> ProviderResult<Vec<HostedZone>> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = self
                .client
                .list_hosted_zones()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(sdk_error)?;

            zones.extend(output.hosted_zones().iter().map(|z| HostedZone {
                id: strip_path(z.id()).into(),
                domain: z.name().to_string(),
            }));

            match output.next_marker() {
                Some(next) if output.is_truncated() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        debug!(count = zones.len(), "Hosted zones listed");
        Ok(zones)
    }

    pub async fn list_records(&self, zone_id: &ResourceId) -> ProviderResult<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut start: Option<(String, Option<RrType>)> = None;

        loop {
            let (name, record_type) = match start.take() {
                Some((name, record_type)) => (Some(name), record_type),
                None => (None, None),
            };
            let output = self
                .client
                .list_resource_record_sets()
                .hosted_zone_id(zone_id.as_str())
                .set_start_record_name(name)
                .set_start_record_type(record_type)
                .send()
                .await
                .map_err(sdk_error)?;

            records.extend(output.resource_record_sets().iter().map(record_from));

            match output.next_record_name() {
                Some(next) if output.is_truncated() => {
                    start = Some((next.to_string(), output.next_record_type().cloned()));
                }
                _ => break,
            }
        }
        Ok(records)
    }

    pub async fn change_record(
        &self,
        zone_id: &ResourceId,
        change: &RecordChange,
    ) -> ProviderResult<ResourceId> {
        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id.as_str())
            .change_batch(change_batch(change)?)
            .send()
            .await
            .map_err(sdk_error)?;

        output
            .change_info()
            .map(|info| ResourceId::from(strip_path(info.id())))
            .ok_or_else(|| ProviderError::other("ChangeResourceRecordSets returned no change"))
    }

    pub async fn change_in_sync(&self, change_id: &ResourceId) -> ProviderResult<bool> {
        let output = self
            .client
            .get_change()
            .id(change_id.as_str())
            .send()
            .await
            .map_err(sdk_error)?;
        Ok(output
            .change_info()
            .is_some_and(|info| info.status() == &ChangeStatus::Insync))
    }
}

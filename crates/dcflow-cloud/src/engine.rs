//! The orchestration engine
//!
//! One [`Engine`] drives one pass (provision, decommission or capture)
//! against a single provider. Calls are issued one at a time; every wait
//! completes before the next call is made.

use crate::accessors::{
    DnsAccessor, FirewallGroupAccessor, GatewayAccessor, ImageAccessor, InstanceAccessor,
    KeyPairAccessor, NetworkAccessor, RouteTableAccessor, SubnetAccessor,
};
use crate::credentials::CredentialStore;
use crate::error::{CloudError, Result};
use crate::lookup::{Accessor, Ensured};
use crate::provider::Provider;
use crate::remote::{ResourceId, ResourceKind, RuleTarget};
use crate::report::{Report, StepOutcome};
use crate::rules::{RuleAccessor, RuleKey};
use dcflow_core::{BootTemplate, LogicalName, RuleSpec};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

pub struct Engine {
    provider: Arc<dyn Provider>,
    pub(crate) networks: NetworkAccessor,
    pub(crate) gateways: GatewayAccessor,
    pub(crate) route_tables: RouteTableAccessor,
    pub(crate) subnets: SubnetAccessor,
    pub(crate) firewall_groups: FirewallGroupAccessor,
    pub(crate) rules: RuleAccessor,
    pub(crate) key_pairs: KeyPairAccessor,
    pub(crate) instances: InstanceAccessor,
    pub(crate) images: ImageAccessor,
    pub(crate) dns: DnsAccessor,
    pub(crate) boot_template: BootTemplate,
}

impl Engine {
    pub fn new(
        provider: Arc<dyn Provider>,
        credentials: CredentialStore,
        boot_template: BootTemplate,
    ) -> Self {
        Self {
            networks: NetworkAccessor::new(provider.clone()),
            gateways: GatewayAccessor::new(provider.clone()),
            route_tables: RouteTableAccessor::new(provider.clone()),
            subnets: SubnetAccessor::new(provider.clone()),
            firewall_groups: FirewallGroupAccessor::new(provider.clone()),
            rules: RuleAccessor::new(provider.clone()),
            key_pairs: KeyPairAccessor::new(provider.clone(), credentials),
            instances: InstanceAccessor::new(provider.clone()),
            images: ImageAccessor::new(provider.clone()),
            dns: DnsAccessor::new(provider.clone()),
            boot_template,
            provider,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.key_pairs.store()
    }

    /// Structural key of a declared rule, resolving group targets by id
    pub(crate) fn rule_key(
        &self,
        rule: &RuleSpec,
        group_ids: &HashMap<LogicalName, ResourceId>,
    ) -> Result<RuleKey> {
        let (from_port, to_port) = rule.ports();
        let target = match rule {
            RuleSpec::Cidr(r) => RuleTarget::Cidr(r.cidr.clone()),
            RuleSpec::Group(r) => {
                let id = group_ids
                    .get(&r.group_name)
                    .ok_or_else(|| CloudError::Unresolved {
                        kind: ResourceKind::FirewallGroup,
                        name: r.group_name.to_string(),
                    })?;
                RuleTarget::Group(id.clone())
            }
        };
        Ok(RuleKey::new(from_port, to_port, rule.protocol(), target))
    }
}

/// Log an aborted pass once, at the orchestrator boundary
pub(crate) fn log_abort<T>(pass: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!(pass, kind = ?e.kind(), "{}", e);
    }
    result
}

pub(crate) fn record_ensured<A: Accessor>(
    report: &mut Report,
    name: &LogicalName,
    ensured: &Ensured<A::Remote>,
) {
    let outcome = if ensured.was_created() {
        StepOutcome::Created
    } else {
        StepOutcome::Unchanged
    };
    report.record(A::KIND, name.as_str(), outcome);
}

pub(crate) fn record_removed<T>(
    report: &mut Report,
    kind: ResourceKind,
    name: &LogicalName,
    removed: &Option<T>,
) {
    let outcome = if removed.is_some() {
        StepOutcome::Deleted
    } else {
        StepOutcome::Absent
    };
    report.record(kind, name.as_str(), outcome);
}

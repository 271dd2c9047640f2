//! Firewall rule identity
//!
//! Rules carry no tags. A rule is identified by its ports, protocol and
//! target, compared exactly: CIDR blocks textually, group targets by the
//! resolved group id. No CIDR or port-range normalization is attempted.

use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::provider::Provider;
use crate::remote::{IngressRule, ResourceId, ResourceKind, RuleTarget};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Structural identity of an inbound rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub from_port: i32,
    pub to_port: i32,
    pub protocol: String,
    pub target: RuleTarget,
}

impl RuleKey {
    pub fn new(from_port: i32, to_port: i32, protocol: impl Into<String>, target: RuleTarget) -> Self {
        Self {
            from_port,
            to_port,
            protocol: protocol.into(),
            target,
        }
    }

    pub fn matches(&self, rule: &IngressRule) -> bool {
        self.from_port == rule.from_port
            && self.to_port == rule.to_port
            && self.protocol == rule.protocol
            && self.target == rule.target
    }

    pub fn to_rule(&self, description: Option<String>) -> IngressRule {
        IngressRule {
            from_port: self.from_port,
            to_port: self.to_port,
            protocol: self.protocol.clone(),
            target: self.target.clone(),
            description,
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} from {}",
            self.protocol, self.from_port, self.to_port, self.target
        )
    }
}

/// Inbound rules of security groups
pub struct RuleAccessor {
    provider: Arc<dyn Provider>,
}

impl RuleAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn find(&self, group_id: &ResourceId, key: &RuleKey) -> Result<Option<IngressRule>> {
        let rules = self
            .provider
            .describe_ingress_rules(group_id)
            .await
            .or_fail("Error loading the security group rules!")?;
        let matching = rules.into_iter().filter(|r| key.matches(r)).collect();
        resolve_unique(ResourceKind::FirewallRule, &key.to_string(), matching)
    }

    pub async fn create(&self, group_id: &ResourceId, rule: &IngressRule) -> Result<()> {
        self.provider
            .authorize_ingress(group_id, rule)
            .await
            .or_fail("Error creating the security group rule!")
    }

    pub async fn delete(&self, group_id: &ResourceId, rule: &IngressRule) -> Result<()> {
        self.provider
            .revoke_ingress(group_id, rule)
            .await
            .or_fail("Error deleting the security group rule!")
    }

    /// Authorize the rule unless an identical one exists; `true` if created
    pub async fn ensure_created(
        &self,
        group_id: &ResourceId,
        key: &RuleKey,
        description: Option<&str>,
    ) -> Result<bool> {
        if self.find(group_id, key).await?.is_some() {
            warn!(group = %group_id, rule = %key, "Security group rule already exists");
            return Ok(false);
        }
        self.create(group_id, &key.to_rule(description.map(str::to_string)))
            .await?;
        info!(group = %group_id, rule = %key, "Security group rule created");
        Ok(true)
    }

    /// Revoke the rule if present; `true` if deleted
    pub async fn ensure_deleted(&self, group_id: &ResourceId, key: &RuleKey) -> Result<bool> {
        let Some(rule) = self.find(group_id, key).await? else {
            warn!(group = %group_id, rule = %key, "Security group rule already deleted");
            return Ok(false);
        };
        self.delete(group_id, &rule).await?;
        info!(group = %group_id, rule = %key, "Security group rule deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(target: RuleTarget) -> IngressRule {
        IngressRule {
            from_port: 80,
            to_port: 90,
            protocol: "tcp".into(),
            target,
            description: Some("web".into()),
        }
    }

    #[test]
    fn test_cidr_rules_match_textually() {
        let key = RuleKey::new(80, 90, "tcp", RuleTarget::Cidr("10.0.0.0/24".into()));
        assert!(key.matches(&rule(RuleTarget::Cidr("10.0.0.0/24".into()))));
        assert!(!key.matches(&rule(RuleTarget::Cidr("10.0.0.0/25".into()))));
        assert!(!key.matches(&rule(RuleTarget::Cidr("10.0.0.1/24".into()))));
    }

    #[test]
    fn test_group_rules_match_by_resolved_id() {
        let key = RuleKey::new(80, 90, "tcp", RuleTarget::Group("sg-1".into()));
        assert!(key.matches(&rule(RuleTarget::Group("sg-1".into()))));
        assert!(!key.matches(&rule(RuleTarget::Group("sg-2".into()))));
    }

    #[test]
    fn test_description_is_not_part_of_identity() {
        let key = RuleKey::new(80, 90, "tcp", RuleTarget::Cidr("0.0.0.0/0".into()));
        let mut live = rule(RuleTarget::Cidr("0.0.0.0/0".into()));
        live.description = None;
        assert!(key.matches(&live));
    }

    #[test]
    fn test_port_and_protocol_must_match_exactly() {
        let key = RuleKey::new(80, 80, "tcp", RuleTarget::Cidr("0.0.0.0/0".into()));
        assert!(!key.matches(&rule(RuleTarget::Cidr("0.0.0.0/0".into()))));

        let key = RuleKey::new(80, 90, "udp", RuleTarget::Cidr("0.0.0.0/0".into()));
        assert!(!key.matches(&rule(RuleTarget::Cidr("0.0.0.0/0".into()))));
    }
}

use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::lookup::Accessor;
use crate::provider::{NewInstance, NewResource, Provider};
use crate::remote::{Instance, ResourceId, ResourceKind, TerminalState};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct InstanceRequest {
    pub launch: NewInstance,
    pub tags: Tags,
}

pub struct InstanceAccessor {
    provider: Arc<dyn Provider>,
}

impl InstanceAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Accessor for InstanceAccessor {
    type Remote = Instance;
    type Request = InstanceRequest;

    const KIND: ResourceKind = ResourceKind::Instance;

    /// Shutting-down and terminated instances linger in describe results
    /// for a while; they are neither live nor duplicates.
    async fn find(&self, name: &LogicalName) -> Result<Option<Instance>> {
        let found = self
            .provider
            .describe_instances(name)
            .await
            .or_fail("Error loading the instance!")?;
        let live = found.into_iter().filter(|i| i.state.is_live()).collect();
        resolve_unique(Self::KIND, name.as_str(), live)
    }

    async fn create(&self, name: &LogicalName, request: &InstanceRequest) -> Result<ResourceId> {
        let resource = NewResource::Instance(request.launch.clone());
        let created = self
            .provider
            .create(&resource, &request.tags.with_identity(name))
            .await
            .or_fail("Error creating the instance!")?;
        self.provider
            .wait_until(Self::KIND, &created.id, TerminalState::Running)
            .await
            .or_fail("Error waiting for the instance to run!")?;
        Ok(created.id)
    }

    /// Terminate and wait: groups and subnets cannot go while it lives
    async fn delete(&self, remote: &Instance) -> Result<()> {
        self.provider
            .delete(Self::KIND, &remote.id)
            .await
            .or_fail("Error deleting the instance!")?;
        self.provider
            .wait_until(Self::KIND, &remote.id, TerminalState::Terminated)
            .await
            .or_fail("Error waiting for the instance to terminate!")
    }
}

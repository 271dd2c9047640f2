use crate::error::{ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::lookup::Accessor;
use crate::provider::{ImageQuery, NewResource, Provider};
use crate::remote::{Image, ResourceId, ResourceKind, TerminalState};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub instance_id: ResourceId,
    pub description: Option<String>,
    pub tags: Tags,
}

/// Machine images
///
/// Images captured by the engine are found by their `Name` tag. Parent
/// images are built elsewhere and only looked up by provider image name.
pub struct ImageAccessor {
    provider: Arc<dyn Provider>,
}

impl ImageAccessor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn find_by_image_name(&self, image_name: &str) -> Result<Option<Image>> {
        let found = self
            .provider
            .describe_images(&ImageQuery::Named(image_name.to_string()))
            .await
            .or_fail("Error loading the image!")?;
        resolve_unique(ResourceKind::Image, image_name, found)
    }
}

#[async_trait]
impl Accessor for ImageAccessor {
    type Remote = Image;
    type Request = ImageRequest;

    const KIND: ResourceKind = ResourceKind::Image;

    async fn find(&self, name: &LogicalName) -> Result<Option<Image>> {
        let found = self
            .provider
            .describe_images(&ImageQuery::Tagged(name.clone()))
            .await
            .or_fail("Error loading the image!")?;
        resolve_unique(Self::KIND, name.as_str(), found)
    }

    async fn create(&self, name: &LogicalName, request: &ImageRequest) -> Result<ResourceId> {
        let resource = NewResource::Image {
            instance_id: request.instance_id.clone(),
            image_name: name.to_string(),
            description: request.description.clone(),
        };
        let created = self
            .provider
            .create(&resource, &request.tags.with_identity(name))
            .await
            .or_fail("Error creating the image!")?;
        self.provider
            .wait_until(Self::KIND, &created.id, TerminalState::Available)
            .await
            .or_fail("Error waiting for the image to become available!")?;
        Ok(created.id)
    }

    /// Deregisters the image; the provider also drops its snapshots
    async fn delete(&self, remote: &Image) -> Result<()> {
        self.provider
            .delete(Self::KIND, &remote.id)
            .await
            .or_fail("Error deleting the image!")
    }
}

use crate::credentials::CredentialStore;
use crate::error::{CloudError, ProviderError, ProviderResultExt, Result};
use crate::identity::resolve_unique;
use crate::lookup::Accessor;
use crate::provider::{NewResource, Provider};
use crate::remote::{KeyPair, ResourceId, ResourceKind};
use async_trait::async_trait;
use dcflow_core::{LogicalName, Tags};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct KeyPairRequest {
    pub tags: Tags,
}

/// Key pairs and their local private key files
pub struct KeyPairAccessor {
    provider: Arc<dyn Provider>,
    store: CredentialStore,
}

impl KeyPairAccessor {
    pub fn new(provider: Arc<dyn Provider>, store: CredentialStore) -> Self {
        Self { provider, store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }
}

#[async_trait]
impl Accessor for KeyPairAccessor {
    type Remote = KeyPair;
    type Request = KeyPairRequest;

    const KIND: ResourceKind = ResourceKind::KeyPair;

    async fn find(&self, name: &LogicalName) -> Result<Option<KeyPair>> {
        let found = self
            .provider
            .describe_key_pairs(name)
            .await
            .or_fail("Error loading the key pair!")?;
        resolve_unique(Self::KIND, name.as_str(), found)
    }

    /// The private key is only returned here, so it is written before
    /// anything else can fail.
    async fn create(&self, name: &LogicalName, request: &KeyPairRequest) -> Result<ResourceId> {
        self.store.check_vacant(name.as_str())?;

        let resource = NewResource::KeyPair {
            key_name: name.to_string(),
        };
        let created = self
            .provider
            .create(&resource, &request.tags.with_identity(name))
            .await
            .or_fail("Error creating the key pair!")?;

        let secret = created.secret.ok_or_else(|| {
            CloudError::provider(
                "Error creating the key pair!",
                ProviderError::other("no private key material returned"),
            )
        })?;
        self.store.save(name.as_str(), &secret).await?;
        Ok(created.id)
    }

    async fn delete(&self, remote: &KeyPair) -> Result<()> {
        self.provider
            .delete(Self::KIND, &remote.id)
            .await
            .or_fail("Error deleting the key pair!")?;
        self.store.remove(&remote.key_name).await?;
        Ok(())
    }
}
